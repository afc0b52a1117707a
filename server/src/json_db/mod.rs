// FICHIER : server/src/json_db/mod.rs

pub mod collections;
pub mod query;
pub mod storage;
pub mod transactions;

// ============================================================================
// UTILITAIRES DE TEST
// ============================================================================
#[cfg(test)]
pub mod test_utils {
    use crate::json_db::collections::manager::CollectionsManager;
    use crate::json_db::storage::{JsonDbConfig, StorageEngine};
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub const TEST_SPACE: &str = "test_space";
    pub const TEST_DB: &str = "test_db";

    pub struct TestEnv {
        pub storage: StorageEngine,
        pub space: String,
        pub db: String,
        pub tmp_dir: tempfile::TempDir,
    }

    impl TestEnv {
        pub fn manager(&self) -> CollectionsManager<'_> {
            CollectionsManager::new(&self.storage, &self.space, &self.db)
        }
    }

    /// Base vide dans un dossier temporaire
    pub async fn init_test_env() -> TestEnv {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("info")
                .with_test_writer()
                .try_init();
        });

        let tmp_dir = tempfile::tempdir().expect("create temp dir");
        let storage = StorageEngine::new(JsonDbConfig::new(tmp_dir.path().to_path_buf()));

        let env = TestEnv {
            storage,
            space: TEST_SPACE.to_string(),
            db: TEST_DB.to_string(),
            tmp_dir,
        };
        env.manager().init_db().await.expect("init db");
        env
    }
}
