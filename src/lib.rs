pub mod errors;
pub mod importer;
pub mod models;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use importer::{import_into, FavoritesImporter};
pub use models::{ExternalFavorite, Folder, FolderEntry, Item, ItemPatch, Node, ROOT_ID};
pub use store::{default_data_dir, FavoritesStore};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Routes engine logs to a rolling file under the host's data directory.
/// The embedding host calls this once at startup; engine code itself only
/// emits through the `tracing` macros.
pub fn init_tracing(data_dir: &Path) -> Result<(), String> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "favorites.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
