use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};

use crate::backend::config::SuffixStrategy;


const RANDOM_SUFFIX_LEN: usize = 8;


/// Produces the token that keeps one export from clobbering another.
///
/// Called once per attempt; an implementation that always returns the same token
/// will make a second export into the same directory fail instead of overwriting.
#[cfg_attr(test, mockall::automock)]
pub trait ExportNamer {
    fn suffix(&mut self) -> String;
}


pub struct RandomSuffix;

impl ExportNamer for RandomSuffix {
    fn suffix(&mut self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(char::from)
            .collect()
    }
}


/// e.g. `20241014T093012345Z`
pub struct TimestampSuffix;

impl ExportNamer for TimestampSuffix {
    fn suffix(&mut self) -> String {
        Utc::now().format("%Y%m%dT%H%M%S%3fZ").to_string()
    }
}


pub struct FixedSuffix(pub String);

impl ExportNamer for FixedSuffix {
    fn suffix(&mut self) -> String { self.0.clone() }
}


pub fn namer_for(strategy: &SuffixStrategy) -> Box<dyn ExportNamer> {
    match strategy {
        SuffixStrategy::Random => Box::new(RandomSuffix),
        SuffixStrategy::Timestamp => Box::new(TimestampSuffix),
        SuffixStrategy::Fixed(token) => Box::new(FixedSuffix(token.clone())),
    }
}


/// keeps only characters that are safe in a file name on every platform
pub(crate) fn sanitize(token: &str) -> String {
    token
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
