//! Behaviour tests for the JSON mirror under `/api/`.
//!
//! Login sets the same session cookie the pages use; the profile endpoint
//! answers `403` until that cookie is presented.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared harness exposes helpers other suites use.
#[allow(dead_code)]
mod support;

use actix_web::http::Method;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use support::{ServerWorld, world};

#[given("an API account {username} with password {password}")]
fn an_api_account(world: &ServerWorld, username: String, password: String) {
    let created = world.post_json(
        "/api/signup/",
        json!({"username": username, "password1": password, "password2": password}),
    );
    assert_eq!(created.status, 201, "body: {}", created.body);
}

#[when("the client logs in over JSON as {username} with password {password}")]
fn the_client_logs_in(world: &ServerWorld, username: String, password: String) {
    world.post_json(
        "/api/login/",
        json!({"username": username, "password": password}),
    );
}

#[when("the client signs up over JSON as {username} with passwords {first} and {second}")]
fn the_client_signs_up(world: &ServerWorld, username: String, first: String, second: String) {
    world.post_json(
        "/api/signup/",
        json!({"username": username, "password1": first, "password2": second}),
    );
}

#[when("the client requests the API profile of {username}")]
fn the_client_requests_the_profile(world: &ServerWorld, username: String) {
    world.get(&format!("/api/profile/{username}/"));
}

#[when("the client searches the API for {query}")]
fn the_client_searches(world: &ServerWorld, query: String) {
    world.get(&format!("/api/search/?query={query}"));
}

#[when("the client requests the API music listing")]
fn the_client_requests_the_music_listing(world: &ServerWorld) {
    world.get("/api/music/");
}

#[when("the client sends {method} to {path}")]
fn the_client_sends(world: &ServerWorld, method: String, path: String) {
    let method = Method::from_bytes(method.as_bytes()).expect("valid method");
    world.request(method, &path);
}

#[then("the API status is {status}")]
fn the_api_status_is(world: &ServerWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status, status, "body: {}", last.body);
}

#[then("the JSON field {field} is {expected}")]
fn the_json_field_is(world: &ServerWorld, field: String, expected: String) {
    let body = world.last().json();
    let actual = match &body[field.as_str()] {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "field {field} in {body}");
}

#[then("the profile bio is blank")]
fn the_profile_bio_is_blank(world: &ServerWorld) {
    let body = world.last().json();
    assert_eq!(body["bio"], "");
}

#[then("the listing holds {count} track")]
fn the_listing_holds(world: &ServerWorld, count: usize) {
    let body = world.last().json();
    let content = body["content"].as_array().expect("content array");
    assert_eq!(content.len(), count);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Logging in over JSON echoes the username"
)]
fn logging_in_over_json_echoes_the_username(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "A wrong password is a bad request"
)]
fn a_wrong_password_is_a_bad_request(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Profiles need a session"
)]
fn profiles_need_a_session(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Signed-in clients can read profiles"
)]
fn signed_in_clients_can_read_profiles(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Mismatched signup passwords are rejected"
)]
fn mismatched_signup_passwords_are_rejected(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Searching with no matches returns an empty list"
)]
fn searching_with_no_matches_returns_an_empty_list(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "The music endpoint lists tracks"
)]
fn the_music_endpoint_lists_tracks(world: ServerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/json_api.feature",
    name = "Unsupported methods are refused"
)]
fn unsupported_methods_are_refused(world: ServerWorld) {
    drop(world);
}
