use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{entities::session::AuthUser, errors::DashboardError, settings::AppConfig};

/// Reads the claims of the access token issued by the remote API.
///
/// Without a shared secret the token is only decoded, as the dashboard does not own
/// the issuer. Expiry is checked whenever the token carries `exp`.
#[derive(Clone)]
pub struct TokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl TokenDecoder {
    pub fn new(secret: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_exp = true;

        let key = match secret {
            Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
            None => {
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        TokenDecoder { key, validation }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        TokenDecoder::new(config.jwt_secret.as_deref())
    }

    pub fn decode(&self, token: &str) -> Result<AuthUser, DashboardError> {
        decode::<AuthUser>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                DashboardError::Unauthenticated
            })
    }
}
