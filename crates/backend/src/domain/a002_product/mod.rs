pub mod import;
pub mod repository;
pub mod service;
