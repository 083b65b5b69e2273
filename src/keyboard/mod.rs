pub mod display;
pub mod events;
pub mod layout;
pub mod state;
pub mod validate;
