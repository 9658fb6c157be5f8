use actix_web::{cookie::Cookie, get, http::header, post, web, HttpRequest, HttpResponse, Responder};

use crate::AppState;

/// The login form itself belongs to the auth service; this only reports the session state.
#[get("/login")]
pub async fn login_page(request: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let authenticated = request
        .cookie(&state.config.auth_cookie)
        .is_some_and(|c| state.token_decoder.decode(c.value()).is_ok());

    let redirect = authenticated.then_some("/");

    HttpResponse::Ok().json(serde_json::json!({
        "title": "Login",
        "authenticated": authenticated,
        "cookie": state.config.auth_cookie,
        "redirect": redirect,
    }))
}

#[post("/logout")]
pub async fn logout(request: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Some(user) = request
        .cookie(&state.config.auth_cookie)
        .and_then(|c| state.token_decoder.decode(c.value()).ok())
    {
        state.forget_session(&user.session_key());
        tracing::info!(user = %user.session_key(), "Signed out");
    }

    let mut removal = Cookie::new(state.config.auth_cookie.clone(), "");
    removal.set_path("/");
    removal.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, state.config.login_path.clone()))
        .cookie(removal)
        .finish()
}
