pub mod a001_member;
pub mod a002_product;
pub mod a003_product_grammage;
pub mod a004_product_transaction;
pub mod a005_role;
pub mod a006_company;
pub mod a007_branch;
pub mod a008_user;
pub mod a009_app_log;
