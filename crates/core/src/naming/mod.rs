//! Release-name handling: normalization for comparison and canonical
//! `Title_(Year).ext` naming for the library.
//!
//! # Example
//!
//! ```ignore
//! use reelhouse_core::naming::{normalize, TitleYearExtractor};
//!
//! assert_eq!(normalize("[YTS] The  Movie"), "the movie");
//!
//! let extractor = TitleYearExtractor::new(lookup);
//! let name = extractor.extract("Movie.Title.2015.1080p.mkv").await?;
//! assert_eq!(name.file_name(), "Movie_Title_(2015).mkv");
//! ```

mod canonical;
mod error;
mod extractor;
mod normalize;

pub use canonical::{
    is_video_file, split_extension, video_extension, CanonicalName, ReleaseYear, YearSource,
    RESOLUTION_MARKERS, VIDEO_EXTENSIONS,
};
pub use error::{LookupFailure, NamingError};
pub use extractor::{CanonicalFile, TitleYearExtractor};
pub use normalize::normalize;
