pub mod api;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod materializer;
pub mod models;
pub mod utils;
