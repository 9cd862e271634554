pub mod handlers;
pub mod queries;
pub mod storage;
pub mod upload;
