use log::*;
use tempfile::TempDir;

use crate::{CorruptionPolicy, JsonFileDatabase};

/// A throwaway store. The backing directory is deleted when this is dropped, so keep it alive for the whole test.
pub struct TestStore {
    pub dir: TempDir,
    pub db: JsonFileDatabase,
}

/// Loads `.env.test`, initialises logging and opens a fresh store in a temporary directory.
pub async fn prepare_test_env() -> TestStore {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let dir = tempfile::tempdir().expect("Error creating temporary directory");
    let db = JsonFileDatabase::open(dir.path(), CorruptionPolicy::ResetToDefault)
        .await
        .expect("Error creating test store");
    info!("🚀️ Created test store in {}", dir.path().display());
    TestStore { dir, db }
}
