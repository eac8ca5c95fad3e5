//! Instrument classification.
//!
//! Volume-ratio screening only makes sense for common stocks. Funds and other
//! non-stock products carry a trailing number in their ticker, and
//! priority-subscription rights (حق تقدم) carry a trailing `ح`, so the default
//! classifier looks at the last character of the identifier.

/// Decides whether an instrument is eligible for breakout screening.
pub trait InstrumentClassifier {
    fn is_eligible(&self, symbol: &str) -> bool;
}

impl<F> InstrumentClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_eligible(&self, symbol: &str) -> bool {
        self(symbol)
    }
}

/// Default suffix markers for subscription rights.
pub const DEFAULT_EXCLUDED_MARKERS: &[char] = &['ح'];

/// Excludes instruments whose identifier ends in a digit or a marker character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixClassifier {
    markers: Vec<char>,
}

impl SuffixClassifier {
    pub fn new(markers: impl IntoIterator<Item = char>) -> Self {
        Self {
            markers: markers.into_iter().collect(),
        }
    }

    pub fn markers(&self) -> &[char] {
        &self.markers
    }
}

impl Default for SuffixClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_MARKERS.iter().copied())
    }
}

impl InstrumentClassifier for SuffixClassifier {
    fn is_eligible(&self, symbol: &str) -> bool {
        match symbol.trim_end().chars().last() {
            Some(last) => !(last.is_ascii_digit() || self.markers.contains(&last)),
            None => false,
        }
    }
}
