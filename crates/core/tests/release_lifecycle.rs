//! Release lifecycle integration tests.
//!
//! These tests drive the download watcher against a temporary directory tree
//! with mock download client, catalog and notifier:
//! - Completed download detection and library placement
//! - Year lookup through the catalog when the filename has none
//! - Fuzzy directory correction and not-found retries
//! - Collisions and rejected files

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::fs;

use reelhouse_core::{
    metadata::CatalogYearLookup,
    notify::NotificationKind,
    testing::{fixtures, MockDownloadClient, MockMovieCatalog, RecordedCatalogQuery, RecordingNotifier},
    DirectoryMatcher, DownloadWatcher, FsPlacer, LibraryConfig, MatcherConfig, ReleaseProcessor,
    TitleYearExtractor, WatcherConfig,
};

/// Test helper wiring the real processor to mock services.
struct TestHarness {
    downloads: PathBuf,
    library: PathBuf,
    staging: PathBuf,
    catalog: MockMovieCatalog,
    client: MockDownloadClient,
    notifier: RecordingNotifier,
    watcher: DownloadWatcher,
    _temp: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let downloads = temp.path().join("downloads");
        let library = temp.path().join("library");
        let staging = temp.path().join("staging");
        fs::create_dir(&downloads).await.unwrap();
        fs::create_dir(&library).await.unwrap();

        let catalog = MockMovieCatalog::new();
        let lookup = CatalogYearLookup::new(Arc::new(catalog.clone()), Duration::from_secs(5));
        let notifier = RecordingNotifier::new();

        let processor = ReleaseProcessor::new(
            &LibraryConfig {
                destination_root: library.clone(),
                staging_dir: staging.clone(),
            },
            DirectoryMatcher::new(&MatcherConfig::default()),
            TitleYearExtractor::new(Arc::new(lookup)),
            Arc::new(FsPlacer::with_defaults()),
            Arc::new(notifier.clone()),
        );
        processor.prepare().await.unwrap();

        let client = MockDownloadClient::new();
        let watcher = DownloadWatcher::new(
            Arc::new(client.clone()),
            Arc::new(processor),
            WatcherConfig::default(),
        );

        Self {
            downloads,
            library,
            staging,
            catalog,
            client,
            notifier,
            watcher,
            _temp: temp,
        }
    }

    /// Reports a completed download called `name` to the mock client.
    async fn complete(&self, hash: &str, name: &str) {
        self.client
            .add_completed(fixtures::download_job(hash, name, &self.downloads))
            .await;
    }
}

async fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    fs::write(path, content).await.unwrap();
}

#[tokio::test]
async fn test_explicit_year_release_is_imported() {
    let h = TestHarness::new().await;
    write(
        &h.downloads.join("The Movie 2015").join("Movie.Title.2015.1080p.mkv"),
        "video",
    )
    .await;
    h.complete("aaa111", "The.Movie (2015)").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.files_placed, 1);
    assert_eq!(
        fs::read_to_string(h.library.join("Movie_Title_(2015).mkv"))
            .await
            .unwrap(),
        "video"
    );
    assert!(!h.downloads.join("The Movie 2015").exists());
    assert_eq!(h.catalog.query_count().await, 0);
    assert_eq!(h.client.removals().await.len(), 1);
}

#[tokio::test]
async fn test_missing_year_is_looked_up() {
    let h = TestHarness::new().await;
    h.catalog
        .add_movie(fixtures::catalog_movie(42, "Some Movie", "2019-06-14"))
        .await;
    write(
        &h.downloads.join("Some.Movie.1080p").join("Some.Movie.1080p.mkv"),
        "video",
    )
    .await;
    h.complete("bbb222", "Some.Movie.1080p").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.files_placed, 1);
    assert!(h.library.join("Some_Movie_(2019).mkv").exists());
    assert_eq!(
        h.catalog.recorded_queries().await,
        vec![
            RecordedCatalogQuery::SearchMovies {
                query: "Some Movie".to_string()
            },
            RecordedCatalogQuery::GetMovie { id: 42 },
        ]
    );

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Imported);
}

#[tokio::test]
async fn test_unknown_title_stays_in_staging() {
    let h = TestHarness::new().await;
    write(
        &h.downloads.join("Unknown.Film.720p").join("Unknown.Film.720p.avi"),
        "video",
    )
    .await;
    h.complete("ccc333", "Unknown.Film.720p").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.files_placed, 0);
    assert!(h.staging.join("Unknown.Film.720p.avi").exists());
    assert!(!h.downloads.join("Unknown.Film.720p").exists());

    let sent = h.notifier.sent().await;
    assert_eq!(sent[0].kind, NotificationKind::Failed);
}

#[tokio::test]
async fn test_misspelled_directory_is_corrected() {
    let h = TestHarness::new().await;
    write(
        &h.downloads.join("The Matrix 1999").join("The.Matrix.1999.mkv"),
        "video",
    )
    .await;
    h.complete("ddd444", "The Matrx 1999").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(h.library.join("The_Matrix_(1999).mkv").exists());
}

#[tokio::test]
async fn test_unmatched_release_is_retried_later() {
    let h = TestHarness::new().await;
    write(&h.downloads.join("Completely Different").join("a.mkv"), "x").await;
    h.complete("eee555", "Some Movie").await;

    let first = h.watcher.poll_once().await.unwrap();
    assert_eq!(first.not_found, 1);
    assert!(h.client.removals().await.is_empty());
    assert!(h.downloads.join("Completely Different").join("a.mkv").exists());

    write(&h.downloads.join("Some Movie").join("Some.Movie.2004.mp4"), "v").await;
    let second = h.watcher.poll_once().await.unwrap();

    assert_eq!(second.processed, 1);
    assert!(h.library.join("Some_Movie_(2004).mp4").exists());
    assert!(h.watcher.is_handled("eee555").await);
}

#[tokio::test]
async fn test_library_collision_keeps_existing_file() {
    let h = TestHarness::new().await;
    write(&h.library.join("Heat_(1995).mkv"), "original").await;
    write(&h.downloads.join("Heat.1995").join("Heat.1995.mkv"), "duplicate").await;
    h.complete("fff666", "Heat.1995").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.files_placed, 0);
    assert_eq!(
        fs::read_to_string(h.library.join("Heat_(1995).mkv"))
            .await
            .unwrap(),
        "original"
    );
    assert_eq!(
        fs::read_to_string(h.staging.join("Heat_(1995).mkv"))
            .await
            .unwrap(),
        "duplicate"
    );
}

#[tokio::test]
async fn test_missing_library_root_leaves_file_staged() {
    let h = TestHarness::new().await;
    fs::remove_dir(&h.library).await.unwrap();
    write(&h.downloads.join("Alien.1979").join("Alien.1979.mkv"), "video").await;
    h.complete("ggg777", "Alien.1979").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.files_placed, 0);
    assert!(!h.library.exists());
    assert!(h.staging.join("Alien_(1979).mkv").exists());
}

#[tokio::test]
async fn test_multiple_files_in_one_release() {
    let h = TestHarness::new().await;
    let release = h.downloads.join("Collection");
    write(&release.join("Alien.1979.mkv"), "a").await;
    write(&release.join("Aliens.1986.mkv"), "b").await;
    write(&release.join("readme.nfo"), "c").await;
    h.complete("hhh888", "Collection").await;

    let summary = h.watcher.poll_once().await.unwrap();

    assert_eq!(summary.files_placed, 2);
    assert!(h.library.join("Alien_(1979).mkv").exists());
    assert!(h.library.join("Aliens_(1986).mkv").exists());
    assert_eq!(h.notifier.sent().await.len(), 2);
    assert!(!release.exists());
}
