// Declare our modules
pub mod api;
pub mod config;
pub mod error;
pub mod reading;
pub mod storage;
