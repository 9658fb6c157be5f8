
use reqwest::{header::LOCATION, StatusCode};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn protected_pages_redirect_to_login_without_a_cookie() {
    let app = TestApp::spawn().await;

    for path in ["/", "/dashboard", "/projects", "/blogs/b1", "/skill/create-skill", "/contacts"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND, "{path}");
        assert_eq!(response.headers()[LOCATION], "/login");
    }
    assert!(app.api.requests().is_empty());
}

#[actix_rt::test]
async fn malformed_token_redirects_to_login() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/projects"))
        .header("Cookie", format!("{COOKIE}=not-a-jwt"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[actix_rt::test]
async fn public_routes_do_not_need_a_session() {
    let app = TestApp::spawn().await;

    let health = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let login = app.client.get(app.url("/login")).send().await.unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = login.json().await.unwrap();
    assert_eq!(body["authenticated"], false);

    let missing = app.client.get(app.url("/no-such-page")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn projects_are_paged_ten_at_a_time() {
    let app = TestApp::spawn().await;

    let page: Value = app.get("/projects", "admin").await.json().await.unwrap();
    assert_eq!(page["rows"].as_array().unwrap().len(), 10);
    assert_eq!(page["page"]["count"], 2);
    assert_eq!(page["page"]["total_count"], 12);
    assert_eq!(page["page"]["can_previous"], false);

    let next: Value = app
        .post_json("/projects/table", "admin", &json!({ "action": "next_page" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(next["rows"].as_array().unwrap().len(), 2);
    assert_eq!(next["page"]["index"], 1);
    assert_eq!(next["page"]["can_next"], false);
}

#[actix_rt::test]
async fn search_filters_the_title_column() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/projects/table", "admin", &json!({ "action": "set_filter", "value": "project 1" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = response.json().await.unwrap();
    assert_eq!(page["page"]["filtered_count"], 4);
    assert_eq!(page["search"], "project 1");
}

#[actix_rt::test]
async fn unknown_table_column_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/projects/table", "admin", &json!({ "action": "toggle_sort", "column": "nope" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn deleting_a_contact_shrinks_the_table() {
    let app = TestApp::spawn().await;

    let before: Value = app.get("/contacts", "admin").await.json().await.unwrap();
    assert_eq!(before["page"]["total_count"], 5);

    let response = app.delete("/contacts/c3", "admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["notice"]["level"], "success");
    assert_eq!(outcome["table"]["page"]["total_count"], 4);

    let after: Value = app.get("/contacts", "admin").await.json().await.unwrap();
    assert_eq!(after["page"]["total_count"], 4);
    assert!(after["rows"].as_array().unwrap().iter().all(|row| row["id"] != "c3"));
}

#[actix_rt::test]
async fn deleting_a_missing_item_reports_the_api_message() {
    let app = TestApp::spawn().await;

    let response = app.delete("/skill/nope", "admin").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["notice"]["message"], "Item not found");
    assert_eq!(outcome["table"]["page"]["total_count"], 2);
}

#[actix_rt::test]
async fn invalid_form_input_is_rejected_before_the_api() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/skill/create-skill",
            "admin",
            &json!({ "name": "Go", "icon": "not a url", "description": "", "category": "backend" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["details"].as_array().unwrap().iter().any(|e| e["field"] == "icon"));
    assert_eq!(app.api.count("POST", "/skill"), 0);
}

#[actix_rt::test]
async fn created_project_appears_in_the_list() {
    let app = TestApp::spawn().await;
    app.get("/projects", "admin").await;

    let response = app
        .post_json(
            "/projects/create-project",
            "admin",
            &json!({
                "title": "Portfolio Dashboard",
                "category": "web",
                "description": "Admin dashboard for the portfolio site",
                "technologies": ["typescript"],
                "features": "tables, forms",
                "status": "ongoing",
                "liveDemoLink": "https://dashboard.example.com"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["redirect"], "/projects");

    let created = app.api.items("projects").into_iter().last().unwrap();
    assert_eq!(created["slug"], "portfolio-dashboard");

    let page: Value = app.get("/projects", "admin").await.json().await.unwrap();
    assert_eq!(page["page"]["total_count"], 13);
}

#[actix_rt::test]
async fn rejected_create_shows_the_api_error() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/blogs/create-blog",
            "admin",
            &json!({
                "title": "Duplicate",
                "category": "rust",
                "author": "Ada",
                "introduction": "Again",
                "content": "<p>Same post</p>"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["notice"]["message"], "Title already exists");
    assert!(outcome.get("redirect").is_none());
}

#[actix_rt::test]
async fn detail_and_update_form_read_the_item() {
    let app = TestApp::spawn().await;

    let detail = app.get("/blogs/b1", "admin").await;
    assert_eq!(detail.status(), StatusCode::OK);
    let body: Value = detail.json().await.unwrap();
    assert_eq!(body["title"], "Ownership in practice");

    let form: Value = app.get("/skill/update-skill/s1", "admin").await.json().await.unwrap();
    assert_eq!(form["mode"], "update");
    assert_eq!(form["values"]["name"], "Rust");

    let missing = app.get("/blogs/nope", "admin").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn overview_summarises_every_collection() {
    let app = TestApp::spawn().await;

    let response = app.get("/", "admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let overview: Value = response.json().await.unwrap();

    assert_eq!(overview["stats"]["projects"], 12);
    assert_eq!(overview["stats"]["blogs"], 2);
    assert_eq!(overview["stats"]["messages"], 5);
    assert_eq!(overview["stats"]["skills"], 2);
    assert_eq!(overview["stats"]["completionRate"], 50);
    assert_eq!(overview["recentMessages"][0]["id"], "c5");
}

#[actix_rt::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::spawn().await;
    app.get("/projects", "admin").await;

    let response = app
        .client
        .post(app.url("/logout"))
        .header("Cookie", app.cookie_for("admin"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/login");
    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with(&format!("{COOKIE}=;")));
    assert!(cookie.contains("Max-Age=0"));
}
