pub mod buffer;
pub mod clipboard;
