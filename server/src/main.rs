#[macro_use]
extern crate rocket;

use std::sync::Arc;

use leaderboard_server::{cache, config::Env, db, entrypoints, warmer};
use rocket_prometheus::PrometheusMetrics;
use shared::github::GithubClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = Env::load().expect("Failed to load environment variables");
    let github = GithubClient::new(
        env.github_api_url(),
        &env.github_repository,
        env.github_token.clone(),
        env.request_timeout(),
    )
    .expect("Failed to create GitHub client");
    tracing::info!(
        "Serving leaderboard of {} with a {} minute cache",
        github.repo_url(),
        env.cache_ttl().num_minutes()
    );

    let cors = rocket_cors::CorsOptions::default()
        .to_cors()
        .expect("Failed to create CORS options");
    let prometheus = PrometheusMetrics::new();

    let mut rocket = rocket::build()
        .attach(db::stage())
        .attach(cache::stage(Arc::new(github), env.cache_ttl()))
        .attach(entrypoints::stage())
        .attach(cors)
        .attach(prometheus.clone())
        .mount("/metrics", prometheus);

    if let Some(interval) = env.warmup_interval() {
        rocket = rocket.attach(warmer::stage(interval));
    }

    rocket
}
