pub mod swap;
pub mod v3_pool;
