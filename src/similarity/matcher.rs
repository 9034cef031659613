/*!
 * Windowed similarity search.
 *
 * Subtitle tracks of the same video follow the same dialogue order, so the
 * counterpart of an entry sitting at 40% of one track is searched around 40%
 * of the other track instead of across the whole document.
 */

use log::{debug, trace};

use super::distance::edit_distance;

/// Default accepted distance, as a fraction of the query length
pub const DEFAULT_DISTANCE_RATE: f64 = 0.6;

/// Default number of entries searched on each side of the expected position
pub const DEFAULT_SEARCH_MARGIN: usize = 10;

/// First-fit matcher over a window of candidate texts
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatcher {
    /// A candidate matches when its distance is below `query_len * distance_rate`
    distance_rate: f64,
    /// Window extends this many entries before the expected position and
    /// scans at most twice as many
    search_margin: usize,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self {
            distance_rate: DEFAULT_DISTANCE_RATE,
            search_margin: DEFAULT_SEARCH_MARGIN,
        }
    }
}

impl SimilarityMatcher {
    /// Create a matcher with custom policy values
    pub fn new(distance_rate: f64, search_margin: usize) -> Self {
        Self {
            distance_rate,
            search_margin,
        }
    }

    pub fn distance_rate(&self) -> f64 {
        self.distance_rate
    }

    pub fn search_margin(&self) -> usize {
        self.search_margin
    }

    /// Whether `candidate` is close enough to `query`
    pub fn is_similar(&self, query: impl AsRef<[u8]>, candidate: impl AsRef<[u8]>) -> bool {
        let query: &[u8] = query.as_ref();
        let distance = edit_distance(query, candidate);
        (distance as f64) < query.len() as f64 * self.distance_rate
    }

    /// Find the first text similar to `query` around `expected_percent` of
    /// `source_texts`.
    ///
    /// The window starts `search_margin` entries before the expected index
    /// (never before 0) and scans forward over at most `2 * search_margin`
    /// candidates. The earliest acceptable candidate wins, not the closest.
    pub fn find_similar<S, Q>(&self, source_texts: &[S], query: &Q, expected_percent: usize) -> Option<usize>
    where
        S: AsRef<[u8]>,
        Q: AsRef<[u8]> + ?Sized,
    {
        let query: &[u8] = query.as_ref();
        let expected = source_texts.len().saturating_mul(expected_percent) / 100;
        let window_start = expected.saturating_sub(self.search_margin);
        let window_len = self.search_margin.saturating_mul(2);

        let found = source_texts
            .iter()
            .enumerate()
            .skip(window_start)
            .take(window_len)
            .find(|(index, candidate)| {
                let similar = self.is_similar(query, candidate);
                trace!("Candidate {} for {:?}: similar={}", index, String::from_utf8_lossy(query), similar);
                similar
            })
            .map(|(index, _)| index);

        match found {
            Some(index) => debug!("Matched {:?} with source entry {}", String::from_utf8_lossy(query), index),
            None => debug!(
                "No similar text for {:?} in window {}..{}",
                String::from_utf8_lossy(query),
                window_start,
                window_start.saturating_add(window_len).min(source_texts.len())
            ),
        }

        found
    }
}
