//! Bulk import pipeline: decode → assign identifiers → validate → upsert
//! inside one transaction.

pub mod batch;
pub mod decoder;
pub mod entity;
pub mod error;
pub mod ids;
pub mod pipeline;
pub mod validator;
pub mod writer;

pub use entity::{ImportContext, ImportEntity, KeyPolicy, RowFault};
pub use error::ImportError;
