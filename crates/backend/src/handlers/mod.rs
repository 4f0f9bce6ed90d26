pub mod a001_member;
pub mod a002_product;
pub mod a009_app_log;
