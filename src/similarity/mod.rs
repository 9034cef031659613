/*!
 * Approximate text matching used to pair subtitles of two tracks.
 *
 * - Case-insensitive Levenshtein distance over bytes
 * - Windowed first-fit search around an expected relative position
 */

pub mod distance;
pub mod matcher;

// Re-export main types
pub use distance::edit_distance;
pub use matcher::{SimilarityMatcher, DEFAULT_DISTANCE_RATE, DEFAULT_SEARCH_MARGIN};
