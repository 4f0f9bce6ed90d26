pub mod response;

pub use response::{SeedReport, TabReport};
