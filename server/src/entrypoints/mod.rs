use rocket::fairing::AdHoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod leaderboard;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    paths(leaderboard::get_leaderboard, leaderboard::get_stored_entries),
    components(schemas(
        types::LeaderboardResponse,
        types::LeaderboardEntryResponse,
        types::ErrorResponse
    ))
)]
pub struct ApiDoc;

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket.attach(leaderboard::stage()).mount(
            "/",
            SwaggerUi::new("/swagger-ui/<_..>").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    })
}
