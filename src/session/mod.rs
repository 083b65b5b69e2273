pub mod controller;
pub mod status;
