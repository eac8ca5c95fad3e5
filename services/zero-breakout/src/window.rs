//! Trading-day volume windows.
//!
//! A window of `n` trading days walks history most-recent-first and sums the
//! first `n` days with nonzero volume. Zero-volume days (holidays, suspensions)
//! do not take a slot, so a window may span more than `n` calendar entries.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenError};

/// Window lengths used by the screener, in trading days.
pub const WINDOW_LENGTHS: [usize; 4] = [2, 5, 10, 20];

/// Longest window; history must contain at least this many trading days.
pub const LONGEST_WINDOW: usize = 20;

/// Sum the volume of the first `n` trading days in `volumes`.
///
/// `volumes` is ordered most-recent-first. Days with volume exactly `0` are
/// skipped and do not count toward `n`.
///
/// # Errors
///
/// Returns [`ScreenError::InsufficientHistory`] when the sequence is exhausted
/// before `n` trading days are found.
pub fn volume_over_trading_days<I>(volumes: I, n: usize) -> Result<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut total = 0.0;
    let mut days = 0;

    if n == 0 {
        return Ok(total);
    }

    for volume in volumes {
        if volume == 0.0 {
            continue;
        }
        total += volume;
        days += 1;
        if days == n {
            return Ok(total);
        }
    }

    Err(ScreenError::InsufficientHistory {
        window: n,
        found: days,
    })
}

/// Volume sums over the 2, 5, 10 and 20 trading-day windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingDayWindows {
    pub vol2: f64,
    pub vol5: f64,
    pub vol10: f64,
    pub vol20: f64,
}

impl TradingDayWindows {
    /// Compute all four windows from a most-recent-first volume slice.
    pub fn collect(volumes: &[f64]) -> Result<Self> {
        let sum = |n| volume_over_trading_days(volumes.iter().copied(), n);

        Ok(Self {
            vol2: sum(2)?,
            vol5: sum(5)?,
            vol10: sum(10)?,
            vol20: sum(LONGEST_WINDOW)?,
        })
    }

    /// Average volume per trading day over the 20-day window.
    pub fn avg20(&self) -> f64 {
        self.vol20 / LONGEST_WINDOW as f64
    }
}
