pub mod feed;
pub mod friends;
pub mod health;
pub mod profile;
