pub mod aggregate;

pub use aggregate::{AppLog, CreateAppLogDto};
