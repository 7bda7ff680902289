pub mod api;
pub mod dashboard;
pub mod gui;
pub mod logging;
pub mod settings;
