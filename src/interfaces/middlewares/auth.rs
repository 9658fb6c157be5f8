use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::session::AccessToken, AppState};

/// Route patterns that need a signed-in user. `:id` matches one path segment.
pub const PROTECTED_ROUTES: &[&str] = &[
    "/",
    "/dashboard",
    "/blogs",
    "/blogs/:id",
    "/blogs/create-blog",
    "/blogs/update-blog/:id",
    "/projects",
    "/projects/:id",
    "/projects/create-project",
    "/projects/update-project/:id",
    "/skill",
    "/skill/:id",
    "/skill/create-skill",
    "/skill/update-skill/:id",
    "/contacts",
    "/contacts/:id",
];

/// Redirects unauthenticated requests on protected routes to the login page and
/// attaches the decoded user and access token to authenticated ones.
pub struct AuthGate;

impl<S> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthGateService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == actix_web::http::Method::OPTIONS || !is_protected(req.path()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in middleware");
                return Ok(req.into_response(HttpResponse::InternalServerError().finish()));
            };
            let login_path = state.config.login_path.clone();

            let Some(token) = req.cookie(&state.config.auth_cookie).map(|c| c.value().to_string()) else {
                tracing::debug!(path = %req.path(), "No access token cookie; redirecting to login");
                return Ok(redirect(req, &login_path));
            };

            match state.token_decoder.decode(&token) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(AccessToken::new(token));
                    service.call(req).await
                }
                Err(_) => {
                    tracing::warn!(path = %req.path(), "Invalid or expired access token; redirecting to login");
                    Ok(redirect(req, &login_path))
                }
            }
        })
    }
}

/// Whether `path` matches one of [`PROTECTED_ROUTES`].
pub fn is_protected(path: &str) -> bool {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    PROTECTED_ROUTES.iter().any(|pattern| matches_pattern(pattern, path))
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(e), Some(a)) if e.starts_with(':') => {
                if a.is_empty() {
                    return false;
                }
            }
            (Some(e), Some(a)) if e == a => {}
            _ => return false,
        }
    }
}

fn redirect(req: ServiceRequest, location: &str) -> ServiceResponse<BoxBody> {
    req.into_response(
        HttpResponse::Found()
            .insert_header((header::LOCATION, location.to_string()))
            .finish(),
    )
}
