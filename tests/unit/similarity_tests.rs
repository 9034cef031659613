/*!
 * Tests for edit distance and windowed similarity search
 */

use subresync::similarity::{edit_distance, SimilarityMatcher, DEFAULT_DISTANCE_RATE, DEFAULT_SEARCH_MARGIN};
use crate::common::DIALOGUE;

/// Test identity, empty input and the classic example
#[test]
fn test_editDistance_basicProperties() {
    for text in DIALOGUE {
        assert_eq!(edit_distance(text, text), 0);
        assert_eq!(edit_distance("", text), text.len());
    }
    assert_eq!(edit_distance("kitten", "sitting"), 3);
}

/// Test symmetry over every dialogue pair
#[test]
fn test_editDistance_allPairs_shouldBeSymmetric() {
    for a in DIALOGUE {
        for b in DIALOGUE {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }
}

/// Test case-insensitive comparison
#[test]
fn test_editDistance_caseOnlyDifference_shouldBeZero() {
    assert_eq!(edit_distance("ABC", "abc"), 0);
    assert_eq!(edit_distance("WHERE WERE YOU LAST NIGHT?", DIALOGUE[0]), 0);
}

/// Test the default policy values
#[test]
fn test_matcher_default_shouldUseStandardPolicy() {
    let matcher = SimilarityMatcher::default();
    assert_eq!(matcher.distance_rate(), DEFAULT_DISTANCE_RATE);
    assert_eq!(matcher.search_margin(), DEFAULT_SEARCH_MARGIN);
    assert_eq!(DEFAULT_SEARCH_MARGIN, 10);
    assert!((DEFAULT_DISTANCE_RATE - 0.6).abs() < f64::EPSILON);
}

/// Test that a slightly altered text still finds its counterpart
#[test]
fn test_matcher_findSimilar_withTypos_shouldMatch() {
    let matcher = SimilarityMatcher::default();
    let found = matcher.find_similar(&DIALOGUE, "nobody at the ofice saw you", 25);
    assert_eq!(found, Some(2));
}

/// Test that unrelated text is rejected
#[test]
fn test_matcher_findSimilar_withUnrelatedText_shouldReturnNone() {
    let matcher = SimilarityMatcher::default();
    assert_eq!(matcher.find_similar(&DIALOGUE, "zzzzzzzzzzzzzzzzzzzz", 50), None);
}

/// Test that a small margin keeps the search local
#[test]
fn test_matcher_findSimilar_withSmallMargin_shouldOnlySearchNearby() {
    let matcher = SimilarityMatcher::new(DEFAULT_DISTANCE_RATE, 1);
    // expected index 0, window covers entries 0 and 1
    assert_eq!(matcher.find_similar(&DIALOGUE, DIALOGUE[1], 0), Some(1));
    assert_eq!(matcher.find_similar(&DIALOGUE, DIALOGUE[7], 0), None);
}
