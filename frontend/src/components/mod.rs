pub mod camera_view;
pub mod handlers;
pub mod header;
pub mod help;
pub mod history;
pub mod mode_switch;
pub mod results;
pub mod settings;
pub mod theme_toggle;
pub mod upload_section;
pub mod utils;
