use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use super::types::*;
use crate::catalog::Movie;
use crate::db::{DbError, Vote, VoteRepo, VoteTally};
use crate::server::AppState;

pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.catalog.movies().to_vec())
}

/// `GET /votes?imdbId=<id>`. An absent parameter behaves like an id with
/// no recorded votes: 200 with an empty object.
pub async fn get_votes(
    State(state): State<AppState>,
    Query(params): Query<TallyParams>,
) -> Result<Json<VoteTally>, StatusCode> {
    let Some(imdb_id) = params.imdb_id else {
        return Ok(Json(VoteTally::new()));
    };

    let tally = state.db.vote_tally(&imdb_id).await.map_err(|e| {
        error!("Failed to tally votes for {}: {}", imdb_id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(tally))
}

pub async fn post_vote(
    State(state): State<AppState>,
    body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<StatusCode, StatusCode> {
    // Absent, unparseable and unknown-field bodies all map to 400.
    let Json(body) = body.map_err(|_| StatusCode::BAD_REQUEST)?;

    let vote = Vote {
        imdbid: body.imdb_id,
        votetype: body.vote_type,
    };

    match state.db.insert_vote(&vote).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(DbError::InvalidVote(_)) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            error!("Failed to insert vote for {}: {}", vote.imdbid, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::catalog::Catalog;
    use crate::db::SqliteRepository;
    use crate::middleware::NormalizePath;
    use crate::server::{build_app, AppState};

    async fn test_app() -> NormalizePath<Router> {
        let db = Arc::new(SqliteRepository::open_in_memory().await.unwrap());
        let catalog = Arc::new(Catalog::load().unwrap());
        build_app(AppState::new(db, catalog))
    }

    fn json_post(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_then_tally() {
        let app = test_app().await;

        let body = r#"{"imdbId": "tt1234567", "voteType": "like"}"#;
        let response = app.clone().oneshot(json_post("/votes", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get("/votes?imdbId=tt1234567"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"like": 1}));
    }

    #[tokio::test]
    async fn test_tally_accumulates_per_type() {
        let app = test_app().await;

        for body in [
            r#"{"imdbId": "tt0133093", "voteType": "like"}"#,
            r#"{"imdbId": "tt0133093", "voteType": "like"}"#,
            r#"{"imdbId": "tt0133093", "voteType": "dislike"}"#,
        ] {
            let response = app.clone().oneshot(json_post("/votes", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(get("/votes?imdbId=tt0133093"))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"like": 2, "dislike": 1})
        );
    }

    #[tokio::test]
    async fn test_tally_of_unvoted_movie_is_empty_object() {
        let app = test_app().await;

        let response = app
            .oneshot(get("/votes?imdbId=tt9999999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_tally_without_parameter_is_empty_object() {
        let app = test_app().await;

        let response = app.oneshot(get("/votes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_post_malformed_body() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_post("/votes", "not json at all"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Missing voteType.
        let response = app
            .clone()
            .oneshot(json_post("/votes", r#"{"imdbId": "tt1234567"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Unknown field.
        let body = r#"{"imdbId": "tt1234567", "voteType": "like", "user": "bob"}"#;
        let response = app.clone().oneshot(json_post("/votes", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing was stored along the way.
        let response = app
            .oneshot(get("/votes?imdbId=tt1234567"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_post_empty_movie_id() {
        let app = test_app().await;

        let body = r#"{"imdbId": "", "voteType": "like"}"#;
        let response = app.oneshot(json_post("/votes", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_movies() {
        let app = test_app().await;

        let response = app.oneshot(get("/movies")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let movies = json.as_array().unwrap();
        assert!(!movies.is_empty());
        assert!(movies[0].get("imdbId").is_some());
        assert!(movies[0].get("title").is_some());
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let app = test_app().await;

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/votes")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = app
            .clone()
            .oneshot(json_post("/movies", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let app = test_app().await;

        let response = app.oneshot(get("/nosuchpath")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_slashes_are_normalized() {
        let app = test_app().await;

        // A bare "//movies" parses as an authority-form Uri, so spell the
        // request out with a full URL.
        let response = app
            .oneshot(get("http://localhost//movies"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
