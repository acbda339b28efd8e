//! Integration tests for the REST catalog routes
//!
//! Request validation runs before a transaction is opened, so the first
//! group of tests needs no database. The rest use `require_db!`.

mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{
    admin_token, create_director, create_movie, get, send, test_app, unique, unreachable_pool,
    user_token,
};

// ========== Validation (no database) ==========

#[rstest]
#[case("/rest/movies?limit=-1", "VALIDATION_ERROR")]
#[case("/rest/movies?skip=-3", "VALIDATION_ERROR")]
#[case("/rest/directors?limit=-1", "VALIDATION_ERROR")]
#[case("/rest/genres?limit=500", "VALIDATION_ERROR")]
#[case("/rest/movies?order_by=rating", "INVALID_QUERY_PARAM")]
#[case("/rest/movies?sort_by=sideways", "INVALID_QUERY_PARAM")]
#[case("/rest/movies/movie", "MISSING_FIELD")]
#[case("/rest/directors/director", "VALIDATION_ERROR")]
#[case("/rest/genres/genre?id=6a1f0c52-51a5-4d3c-9a0e-0b1a8f7d2c11&name=Drama", "VALIDATION_ERROR")]
#[tokio::test]
async fn test_invalid_requests_rejected(#[case] uri: &str, #[case] code: &str) {
    let app = test_app(unreachable_pool());

    let (status, body) = get(&app, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {body}");
    assert_eq!(body["code"], code);
}

#[tokio::test]
async fn test_storage_failure_is_generic() {
    let app = test_app(unreachable_pool());

    let (status, body) = get(&app, "/rest/movies").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_FAILURE");
    assert_eq!(body["message"], "an internal error occurred");
}

// ========== Reads ==========

#[tokio::test]
async fn test_zero_limit_returns_empty_list() {
    require_db!(pool);
    let app = test_app(pool);

    for uri in [
        "/rest/movies?skip=0&limit=0",
        "/rest/directors?limit=0&with_movies=true",
        "/rest/genres?limit=0",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_director_without_movies_has_empty_list() {
    require_db!(pool);
    let app = test_app(pool);
    let id = create_director(&app, &unique("Chantal Akerman")).await;

    let (status, body) = get(
        &app,
        &format!("/rest/directors/director?id={id}&with_movies=true"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"], json!([]));
}

#[tokio::test]
async fn test_flat_lookup_has_no_movies_field() {
    require_db!(pool);
    let app = test_app(pool);
    let name = unique("Yasujiro Ozu");
    let id = create_director(&app, &name).await;

    let (status, body) = get(
        &app,
        &format!("/rest/directors/director?name={}", name.replace(' ', "%20")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert!(body.get("movies").is_none());
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    require_db!(pool);
    let app = test_app(pool);

    let (status, body) = get(&app, &format!("/rest/movies/movie?id={}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// ========== Writes ==========

#[tokio::test]
async fn test_movie_round_trip_keeps_genre_order() {
    require_db!(pool);
    let app = test_app(pool);
    let director_name = unique("Nolan");
    let director_id = create_director(&app, &director_name).await;
    let sci_fi = unique("Sci-Fi");
    let thriller = unique("Thriller");

    let created = create_movie(
        &app,
        json!({
            "title": "Tenet",
            "release_year": 2020,
            "director_id": director_id,
            "genre": format!("{sci_fi}|{thriller}"),
        }),
    )
    .await;
    let movie_id = created["id"].as_str().unwrap();

    let (status, body) = get(
        &app,
        &format!("/rest/movies/movie?id={movie_id}&extended=true"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Tenet");
    assert_eq!(body["release_year"], 2020);
    assert_eq!(body["director"], director_name);
    assert_eq!(body["genre"], format!("{sci_fi} | {thriller}"));
}

#[tokio::test]
async fn test_create_genre_twice_returns_same_id() {
    require_db!(pool);
    let app = test_app(pool);
    let token = admin_token();
    let name = unique("Film Noir");

    let (first_status, first) = send(
        &app,
        Method::POST,
        "/rest/genres/genre",
        Some(&token),
        Some(json!({ "name": name })),
    )
    .await;
    let (_, second) = send(
        &app,
        Method::POST,
        "/rest/genres/genre",
        Some(&token),
        Some(json!({ "name": name })),
    )
    .await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_update_with_unknown_director_keeps_previous() {
    require_db!(pool);
    let app = test_app(pool);
    let director_name = unique("Kelly Reichardt");
    let director_id = create_director(&app, &director_name).await;
    let created = create_movie(
        &app,
        json!({ "title": "First Cow", "director_id": director_id }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/rest/movies/movie",
        Some(&admin_token()),
        Some(json!({
            "id": created["id"],
            "title": "First Cow (2019)",
            "director_id": Uuid::new_v4(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "First Cow (2019)");
    assert_eq!(body["director_id"], director_id.to_string());
    assert_eq!(body["director"], director_name);
}

#[tokio::test]
async fn test_unknown_director_on_create_is_dropped() {
    require_db!(pool);
    let app = test_app(pool);

    let created = create_movie(
        &app,
        json!({ "title": unique("Orphan"), "director_id": Uuid::new_v4() }),
    )
    .await;

    assert!(created["director_id"].is_null());
    assert!(created["director"].is_null());
    assert_eq!(created["genre"], "");
}

#[tokio::test]
async fn test_deleting_director_keeps_movies() {
    require_db!(pool);
    let app = test_app(pool);
    let director_id = create_director(&app, &unique("Satyajit Ray")).await;
    let created = create_movie(
        &app,
        json!({ "title": "Pather Panchali", "director_id": director_id }),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/rest/directors/director/{director_id}"),
        Some(&admin_token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, movie) = get(
        &app,
        &format!("/rest/movies/movie?id={}", created["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(movie["director_id"].is_null());
}

#[tokio::test]
async fn test_deleting_genre_detaches_it_from_movies() {
    require_db!(pool);
    let app = test_app(pool);
    let kept = unique("Noir").replace(' ', "-");
    let dropped = unique("Heist").replace(' ', "-");
    let created = create_movie(
        &app,
        json!({ "title": "Rififi", "genre": format!("{kept}|{dropped}") }),
    )
    .await;
    assert_eq!(created["genre"], json!(format!("{kept} | {dropped}")));

    let (_, genre) = get(&app, &format!("/rest/genres/genre?name={dropped}")).await;
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/rest/genres/genre/{}", genre["id"].as_str().unwrap()),
        Some(&admin_token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, movie) = get(
        &app,
        &format!("/rest/movies/movie?id={}", created["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["genre"], json!(kept));
}

#[tokio::test]
async fn test_deleting_movie_removes_it_from_genre() {
    require_db!(pool);
    let app = test_app(pool);
    let genre = unique("Wuxia").replace(' ', "-");
    let gone = create_movie(&app, json!({ "title": "A Touch of Zen", "genre": genre })).await;
    let stays = create_movie(&app, json!({ "title": "Dragon Inn", "genre": genre })).await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/rest/movies/movie/{}", gone["id"].as_str().unwrap()),
        Some(&admin_token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(
        &app,
        &format!("/rest/genres/genre?name={genre}&with_movies=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|movie| &movie["id"])
        .collect();
    assert_eq!(ids, vec![&stays["id"]]);
}

// ========== Capability check ==========

#[tokio::test]
async fn test_mutation_without_token_is_unauthenticated() {
    require_db!(pool);
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/rest/directors/director",
        None,
        Some(json!({ "name": "Nobody" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_mutation_with_user_scope_is_forbidden() {
    require_db!(pool);
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/rest/movies/movie",
        Some(&user_token()),
        Some(json!({ "title": "Not Allowed" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_invalid_token_counts_as_no_caller() {
    require_db!(pool);
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/rest/genres/genre/{}", Uuid::new_v4()),
        Some("not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}
