pub mod control_bar;
pub mod keyboard_grid;
pub mod status_bar;
pub mod text_panel;
