//! Steps shared by every server-backed feature.

use rstest_bdd_macros::{given, then, when};

use super::ServerWorld;

#[given("a running tracklist server")]
fn a_running_tracklist_server(world: &ServerWorld) {
    let _ = world;
}

#[given("the catalogue holds {name} by {artist} from {album} filed under {genre} lasting {seconds} seconds")]
fn the_catalogue_holds(
    world: &ServerWorld,
    name: String,
    artist: String,
    album: String,
    genre: String,
    seconds: u32,
) {
    world.add_track(&name, &artist, &album, &genre, seconds);
}

#[when("the visitor opens {path}")]
fn the_visitor_opens(world: &ServerWorld, path: String) {
    world.get(&path);
}

#[then("the page status is {status}")]
fn the_page_status_is(world: &ServerWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status, status, "body: {}", last.body);
}

#[then("the response redirects to {location}")]
fn the_response_redirects_to(world: &ServerWorld, location: String) {
    let last = world.last();
    assert_eq!(last.status, 302, "body: {}", last.body);
    assert_eq!(last.location.as_deref(), Some(location.as_str()));
}

#[then("the page shows \"{text}\"")]
fn the_page_shows(world: &ServerWorld, text: String) {
    let last = world.last();
    assert!(last.body.contains(&text), "expected {text:?} in {}", last.body);
}

#[then("the page does not show \"{text}\"")]
fn the_page_does_not_show(world: &ServerWorld, text: String) {
    let last = world.last();
    assert!(!last.body.contains(&text), "unexpected {text:?} in {}", last.body);
}

#[then("the response is {media_type}")]
fn the_response_is(world: &ServerWorld, media_type: String) {
    let last = world.last();
    let content_type = last.content_type.unwrap_or_default();
    assert!(
        content_type.starts_with(&media_type),
        "content type {content_type} is not {media_type}"
    );
}
