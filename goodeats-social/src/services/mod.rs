pub mod feed_service;
pub mod friend_service;
pub mod like_service;
pub mod profile_service;
