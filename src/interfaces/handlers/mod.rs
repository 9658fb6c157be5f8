pub mod auth;
pub mod json_error;
pub mod manage;
pub mod overview;
pub mod system;
