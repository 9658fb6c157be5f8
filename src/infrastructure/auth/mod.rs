pub mod jwt;

pub use jwt::TokenDecoder;
