mod algorithm;

pub use algorithm::{MatchResult, MatchingAlgorithm, PriceTimeMatcher};
