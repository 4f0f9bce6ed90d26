pub mod aggregate;

pub use aggregate::{CreateProductTransactionDto, ProductTransaction};
