pub mod repository;
pub mod sheet;
