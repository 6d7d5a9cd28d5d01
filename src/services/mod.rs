pub mod compose;
pub mod credentials;
pub mod dispatch;
pub mod email;
pub mod menu;
pub mod rotation;
pub mod schedule;
