pub mod app_state;
pub mod config;
pub mod data;
pub mod import;
pub mod sheet;
pub mod upload;
