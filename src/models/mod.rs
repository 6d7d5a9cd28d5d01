pub mod menu;
pub mod message;
