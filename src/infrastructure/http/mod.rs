pub mod api_client;

pub use api_client::{ApiMethod, ApiRequest, ApiResponse, ApiTransport, HttpApiClient};

#[cfg(test)]
pub use api_client::MockApiTransport;
