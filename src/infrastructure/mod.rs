pub mod auth;
pub mod cache;
pub mod http;
pub mod utils;
