/*!
 * # subresync - SubRip subtitle parsing and re-synchronization
 *
 * A Rust library to read, normalize and re-time SubRip subtitles.
 *
 * ## Features
 *
 * - Tolerant parsing of SubRip files, with or without numeric index lines
 * - Writing documents back in the indexed layout
 * - Pairing entries of two tracks with case-insensitive edit distance
 * - Moving one track onto the timeline of another
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Millisecond time codes and their text form
 * - `similarity`: Approximate text matching:
 *   - `similarity::distance`: Levenshtein distance
 *   - `similarity::matcher`: Windowed similarity search
 * - `subtitle_processor`: Subtitle documents, parsing, writing and resync
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod similarity;
pub mod subtitle_processor;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, FormatError, SubtitleError, TimeCodeError};
pub use similarity::{edit_distance, SimilarityMatcher};
pub use subtitle_processor::{Interval, Layout, MatchPair, ResyncPolicy, SubtitleDocument};
pub use timecode::TimeCode;
