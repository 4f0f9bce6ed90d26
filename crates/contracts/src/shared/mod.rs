pub mod import;
pub mod pagination;
pub mod response;
