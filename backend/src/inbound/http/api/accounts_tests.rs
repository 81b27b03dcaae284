//! Regression coverage for the account endpoints.

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use super::NOT_AUTHENTICATED_MESSAGE;
use crate::domain::{DUPLICATE_USERNAME_MESSAGE, INVALID_LOGIN_MESSAGE};
use crate::inbound::http::test_utils::{Browser, init_app, memory_state};

const PASSWORD: &str = "correct horse battery";

async fn json_body(res: actix_web::dev::ServiceResponse) -> Value {
    serde_json::from_slice(&test::read_body(res).await).expect("json body")
}

fn signup_json(username: &str, password1: &str, password2: &str) -> TestRequest {
    TestRequest::post().uri("/api/signup/").set_json(json!({
        "username": username,
        "password1": password1,
        "password2": password2,
    }))
}

#[actix_web::test]
async fn signup_creates_account_without_signing_in() {
    let mut browser = Browser::new(init_app(memory_state()).await);
    let res = browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json_body(res).await, json!({"username": "ada"}));

    let res = browser
        .send(TestRequest::get().uri("/api/profile/ada/"))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case("ada", "one", "two", "password2", "password_mismatch")]
#[case("", PASSWORD, PASSWORD, "username", "required")]
#[case("ada", "", "", "password1", "required")]
#[actix_web::test]
async fn signup_errors_name_the_field(
    #[case] username: &str,
    #[case] password1: &str,
    #[case] password2: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut browser = Browser::new(init_app(memory_state()).await);
    let res = browser.send(signup_json(username, password1, password2)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(body["details"]["errors"][field].is_array(), "{body}");
    if body["details"]["field"] == field {
        assert_eq!(body["details"]["code"], code);
    }
}

#[actix_web::test]
async fn duplicate_signup_is_rejected() {
    let mut browser = Browser::new(init_app(memory_state()).await);
    browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;
    let res = browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["message"], DUPLICATE_USERNAME_MESSAGE);
    assert_eq!(body["details"]["field"], "username");
}

#[rstest]
#[case::json(true)]
#[case::form(false)]
#[actix_web::test]
async fn login_echoes_username_and_opens_a_session(#[case] as_json: bool) {
    let mut browser = Browser::new(init_app(memory_state()).await);
    browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;

    let req = TestRequest::post().uri("/api/login/");
    let req = if as_json {
        req.set_json(json!({"username": "ada", "password": PASSWORD}))
    } else {
        req.set_form([("username", "ada"), ("password", PASSWORD)])
    };
    let res = browser.send(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({"username": "ada"}));

    let res = browser
        .send(TestRequest::get().uri("/api/profile/ada/"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
    assert_eq!(json_body(res).await, json!({"username": "ada", "bio": ""}));
}

#[rstest]
#[case(json!({"username": "ada", "password": "wrong"}), Some(INVALID_LOGIN_MESSAGE))]
#[case(json!({"username": "ada"}), None)]
#[case(json!({}), None)]
#[actix_web::test]
async fn bad_logins_are_bad_requests(#[case] payload: Value, #[case] message: Option<&str>) {
    let mut browser = Browser::new(init_app(memory_state()).await);
    browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;
    let res = browser
        .send(TestRequest::post().uri("/api/login/").set_json(payload))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    if let Some(message) = message {
        assert_eq!(body["message"], message);
    }
}

#[actix_web::test]
async fn login_without_a_body_is_a_bad_request() {
    let mut browser = Browser::new(init_app(memory_state()).await);
    let res = browser.send(TestRequest::post().uri("/api/login/")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn profile_without_session_is_forbidden() {
    let mut browser = Browser::new(init_app(memory_state()).await);
    let res = browser
        .send(TestRequest::get().uri("/api/profile/ada/"))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await["message"], NOT_AUTHENTICATED_MESSAGE);
}

#[rstest]
#[case("/api/profile/nobody/")]
#[case("/api/profile//")]
#[actix_web::test]
async fn unknown_profiles_are_not_found(#[case] uri: &str) {
    let mut browser = Browser::new(init_app(memory_state()).await);
    browser.send(signup_json("ada", PASSWORD, PASSWORD)).await;
    browser
        .send(
            TestRequest::post()
                .uri("/api/login/")
                .set_json(json!({"username": "ada", "password": PASSWORD})),
        )
        .await;
    let res = browser.send(TestRequest::get().uri(uri)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
