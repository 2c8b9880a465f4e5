//! Test helpers: build AppState and router for integration tests.
//!
//! Every app gets its own temporary upload directory and record store and a
//! fixed-score classifier, so no model artifact is needed.

pub mod fixtures;

use axum_test::TestServer;
use certcheck_api::setup::{routes, services};
use certcheck_core::{Config, SubmissionRecord};
use certcheck_processing::test_helpers::FixedScoreClassifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    pub classifier: Arc<FixedScoreClassifier>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_folder
    }

    pub fn details_file(&self) -> PathBuf {
        self.config.details_file.clone()
    }

    /// Records as persisted on disk
    pub fn records(&self) -> Vec<SubmissionRecord> {
        let raw = std::fs::read(&self.config.details_file).expect("read details file");
        serde_json::from_slice(&raw).expect("parse details file")
    }

    /// Names of the files in the upload directory, sorted
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .expect("read upload dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Setup test app whose classifier scores every document as genuine.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(0.9, |_| {}).await
}

/// Setup test app with a given classifier score and config overrides.
pub async fn setup_test_app_with(score: f32, configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = Config::default();
    config.upload_folder = temp_dir.path().join("static").join("uploads");
    config.details_file = temp_dir.path().join("details.json");
    config.max_file_size_bytes = 1024 * 1024;
    configure(&mut config);

    let classifier = Arc::new(FixedScoreClassifier::new(score));
    let state = services::initialize_services(&config, classifier.clone())
        .await
        .expect("Failed to initialize services");
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        config,
        classifier,
        _temp_dir: temp_dir,
    }
}
