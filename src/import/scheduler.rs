use std::time::Duration;

use crate::common::AppState;
use crate::error::AppResult;
use crate::import::{GbfsClient, worker};

/// Run the configured startup imports: GBFS stations, then trip CSV.
///
/// Spawned fire-and-forget from `main`; failures are logged, never fatal.
pub async fn run_startup_import(state: AppState) {
    let config = state.config.clone();

    if config.import_stations_on_startup {
        match GbfsClient::new(&config) {
            Ok(client) => {
                let result = with_retries(
                    "station import",
                    config.import_retry_max,
                    config.import_retry_delay_seconds,
                    || worker::import_stations(&state.db, &client),
                )
                .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Station import failed");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to create GBFS client"),
        }
    }

    if let Some(path) = config.trips_csv_path.clone() {
        // Not retried: a second attempt would insert the same rows again.
        if let Err(e) = worker::import_trips_csv(&state.db, path).await {
            tracing::error!(error = %e, "Trip import failed");
        }
    }
}

async fn with_retries<T, F, Fut>(
    task: &'static str,
    max_retries: u32,
    delay_secs: u64,
    mut run: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut retries = 0;
    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(e) if retries < max_retries => {
                retries += 1;
                tracing::warn!(
                    task,
                    error = %e,
                    retry = retries,
                    max_retries,
                    delay_secs,
                    "Import failed, retrying"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
