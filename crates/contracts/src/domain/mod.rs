pub mod a001_member;
pub mod a002_product;
pub mod a003_product_grammage;
pub mod a004_product_transaction;
pub mod a009_app_log;
