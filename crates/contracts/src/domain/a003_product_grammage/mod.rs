pub mod aggregate;

pub use aggregate::ProductGrammage;
