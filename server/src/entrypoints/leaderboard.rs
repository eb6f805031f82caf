use std::sync::Arc;

use rocket::{http::Status, serde::json::Json, State};

use super::types::{ErrorResponse, LeaderboardResponse};
use crate::cache::LeaderboardCache;

pub type ApiResult<T> = Result<Json<T>, (Status, Json<ErrorResponse>)>;

fn failure(context: &str, error: impl std::fmt::Display) -> (Status, Json<ErrorResponse>) {
    tracing::error!("{context}: {error}");
    (
        Status::InternalServerError,
        Json(ErrorResponse::new(error)),
    )
}

#[utoipa::path(context_path = "/leaderboard", responses(
    (status = 200, description = "Get the ranked contributors, served from cache while it is fresh", body = LeaderboardResponse),
    (status = 500, description = "Refresh failed", body = ErrorResponse)
))]
#[get("/?<refresh>")]
pub async fn get_leaderboard(
    cache: &State<Arc<LeaderboardCache>>,
    refresh: Option<bool>,
) -> ApiResult<LeaderboardResponse> {
    match cache.get_leaderboard(refresh.unwrap_or_default()).await {
        Ok(entries) => Ok(Json(LeaderboardResponse::new(entries))),
        Err(e) => Err(failure("Failed to get leaderboard", e)),
    }
}

#[utoipa::path(context_path = "/leaderboard", responses(
    (status = 200, description = "Get the persisted entries of the last refresh", body = LeaderboardResponse),
    (status = 500, description = "Storage failure", body = ErrorResponse)
))]
#[get("/entries")]
pub async fn get_stored_entries(
    cache: &State<Arc<LeaderboardCache>>,
) -> ApiResult<LeaderboardResponse> {
    match cache.stored_entries().await {
        Ok(entries) => Ok(Json(LeaderboardResponse::new(entries))),
        Err(e) => Err(failure("Failed to get stored leaderboard entries", e)),
    }
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing leaderboard entrypoints", |rocket| async {
        rocket.mount(
            "/leaderboard",
            rocket::routes![get_leaderboard, get_stored_entries],
        )
    })
}
