pub mod db;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod storage;

pub use db::create_pool;
