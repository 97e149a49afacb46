pub mod file_dialogs;
pub mod main_window;
pub mod menu;
pub mod tab_bar;
pub mod theme;
pub mod toolbar;
