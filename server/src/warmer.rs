use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use rocket::fairing::AdHoc;

use crate::cache::LeaderboardCache;

pub fn stage(sleep_duration: Duration) -> AdHoc {
    let atomic_bool = Arc::new(AtomicBool::new(true));
    let atomic_bool_clone = atomic_bool.clone();

    AdHoc::on_ignite("Leaderboard warmer", move |rocket| async move {
        rocket
            .attach(AdHoc::on_liftoff(
                "Refreshes a stale leaderboard every X minutes",
                move |rocket| {
                    Box::pin(async move {
                        let cache: Arc<LeaderboardCache> = match rocket.state().cloned() {
                            Some(cache) => cache,
                            None => {
                                tracing::error!("Leaderboard cache is not managed, warmer disabled");
                                return;
                            }
                        };

                        rocket::tokio::spawn(async move {
                            let mut interval = rocket::tokio::time::interval(sleep_duration);
                            while atomic_bool.load(Ordering::Relaxed) {
                                interval.tick().await;

                                // Only goes upstream when the cached copy is stale
                                if let Err(e) = cache.get_leaderboard(false).await {
                                    tracing::error!("Failed to warm up leaderboard: {e}");
                                }
                            }
                        });
                    })
                },
            ))
            .attach(AdHoc::on_shutdown("Stop warming up leaderboard", |_| {
                Box::pin(async move {
                    atomic_bool_clone.store(false, Ordering::Relaxed);
                })
            }))
    })
}
