pub mod calendar;
pub mod events;
pub mod health;
pub mod internal;
pub mod rsvps;
