use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    entities::session::{AccessToken, AuthUser, RequestContext},
    errors::DashboardError,
};

/// The signed-in user and their credentials, as attached by the auth gate.
/// Fails with 401 on routes the gate does not cover.
/// Usage: Add `session: Session` as a parameter to your handler function.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    pub context: RequestContext,
}

impl Session {
    pub fn key(&self) -> String {
        self.user.session_key()
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let extensions = req.extensions();
        match (extensions.get::<AuthUser>(), extensions.get::<AccessToken>()) {
            (Some(user), Some(token)) => ready(Ok(Session {
                user: user.clone(),
                context: RequestContext::with_token(token.clone()),
            })),
            _ => ready(Err(DashboardError::Unauthenticated.into())),
        }
    }
}
