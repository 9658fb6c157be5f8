
use portfolio_dashboard::entities::resource::InvalidationPolicy;
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

fn duplicate_blog() -> Value {
    json!({
        "title": "Duplicate",
        "category": "rust",
        "author": "Ada",
        "introduction": "Again",
        "content": "<p>Same post</p>"
    })
}

#[actix_rt::test]
async fn lists_are_served_from_cache_across_sessions() {
    let app = TestApp::spawn().await;

    app.get("/projects", "alice").await;
    app.get("/projects", "bob").await;
    app.get("/projects", "alice").await;

    assert_eq!(app.api.count("GET", "/projects"), 1);
    assert_eq!(app.state.cache.len(), 1);
}

#[actix_rt::test]
async fn delete_sends_the_raw_token_and_refreshes_other_sessions() {
    let app = TestApp::spawn().await;
    app.get("/contacts", "alice").await;
    app.get("/contacts", "bob").await;

    let response = app.delete("/contacts/c1", "alice").await;
    assert_eq!(response.status(), StatusCode::OK);

    let delete = app
        .api
        .requests()
        .into_iter()
        .find(|r| r.method == "DELETE")
        .unwrap();
    assert_eq!(delete.path, "/contacts/c1");
    assert_eq!(delete.authorization, Some(access_token_of(&app, "alice")));

    let page: Value = app.get("/contacts", "bob").await.json().await.unwrap();
    assert_eq!(page["page"]["total_count"], 4);
    assert_eq!(app.api.count("GET", "/contacts"), 2);
}

#[actix_rt::test]
async fn contacts_are_fetched_with_the_configured_limit() {
    let app = TestApp::spawn_with(|config| config.contacts_fetch_limit = 25).await;

    app.get("/contacts", "admin").await;

    let list = app.api.requests().into_iter().find(|r| r.path == "/contacts").unwrap();
    assert_eq!(list.query, "limit=25&page=1");
}

#[actix_rt::test]
async fn auth_scheme_prefixes_the_header() {
    let app = TestApp::spawn_with(|config| config.auth_scheme = Some("Bearer".into())).await;

    app.delete("/skill/s1", "admin").await;

    let delete = app.api.requests().into_iter().find(|r| r.method == "DELETE").unwrap();
    assert!(delete.authorization.unwrap().starts_with("Bearer "));
}

#[actix_rt::test]
async fn failed_mutation_still_invalidates_by_default() {
    let app = TestApp::spawn().await;
    app.get("/blogs", "admin").await;

    let response = app.post_json("/blogs/create-blog", "admin", &duplicate_blog()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    app.get("/blogs", "admin").await;
    assert_eq!(app.api.count("GET", "/blogs"), 2);
}

#[actix_rt::test]
async fn failed_mutation_keeps_cache_when_invalidating_on_success_only() {
    let app = TestApp::spawn_with(|config| config.invalidation = InvalidationPolicy::OnSuccess).await;
    app.get("/blogs", "admin").await;

    app.post_json("/blogs/create-blog", "admin", &duplicate_blog()).await;

    app.get("/blogs", "admin").await;
    assert_eq!(app.api.count("GET", "/blogs"), 1);
}

#[actix_rt::test]
async fn mutations_only_invalidate_their_own_collection() {
    let app = TestApp::spawn().await;
    app.get("/skill", "admin").await;
    app.get("/projects", "admin").await;

    app.delete("/skill/s2", "admin").await;
    app.get("/skill", "admin").await;
    app.get("/projects", "admin").await;

    assert_eq!(app.api.count("GET", "/skill"), 2);
    assert_eq!(app.api.count("GET", "/projects"), 1);
}

fn access_token_of(app: &TestApp, sub: &str) -> String {
    app.cookie_for(sub).trim_start_matches(&format!("{COOKIE}=")).to_string()
}
