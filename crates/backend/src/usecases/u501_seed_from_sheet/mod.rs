pub mod executor;

pub use executor::{SeedExecutor, SeedTarget};
