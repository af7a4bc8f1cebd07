pub mod config;
pub mod download_client;
pub mod matcher;
pub mod metadata;
pub mod naming;
pub mod notify;
pub mod placer;
pub mod processor;
pub mod testing;
pub mod watcher;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LibraryConfig,
    SanitizedConfig,
};
pub use download_client::{create_download_client, DownloadClient, DownloadClientError, DownloadJob};
pub use matcher::{DirectoryMatcher, MatcherConfig, SimilarityMetric};
pub use metadata::{create_year_lookup, LookupError, MetadataLookup, YearLookup};
pub use naming::{normalize, CanonicalName, NamingError, ReleaseYear, TitleYearExtractor};
pub use notify::{create_notifier, Notification, Notifier, NotifyError};
pub use placer::{FsPlacer, PlacedFile, Placer, PlacerConfig, PlacerError, SkipReason};
pub use processor::{ProcessingError, ReleaseProcessor, ReleaseReport};
pub use watcher::{DownloadWatcher, PollSummary, WatcherConfig, WatcherError};
