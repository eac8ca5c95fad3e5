//! Input data contracts for the breakout screener.
//!
//! All types here are read-only inputs; the screener never mutates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenError};

// ============================================================================
// Daily History
// ============================================================================

/// One trading day's aggregate for an instrument.
///
/// Sequences of records are ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Trading date (diagnostic only, never used for scoring)
    pub date: NaiveDate,
    /// Total traded volume for the day
    pub total_volume: f64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, total_volume: f64) -> Self {
        Self { date, total_volume }
    }

    /// A zero-volume day is a holiday or suspension and is skipped by windows.
    pub fn is_trading_day(&self) -> bool {
        self.total_volume != 0.0
    }
}

/// Reject NaN, infinite, or negative daily volumes.
pub fn validate_volumes(volumes: &[f64]) -> Result<()> {
    for (i, &v) in volumes.iter().enumerate() {
        if !v.is_finite() || v < 0.0 {
            return Err(ScreenError::invalid(format!("daily_volumes[{i}]"), v));
        }
    }
    Ok(())
}

// ============================================================================
// Instrument Snapshot
// ============================================================================

/// Current-period buy/sell aggregates for the instrument under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    /// Total buy-side volume
    pub buy_volume: f64,
    /// Number of buy trades
    pub buy_trade_count: f64,
    /// Total sell-side volume
    pub sell_volume: f64,
    /// Number of sell trades
    pub sell_trade_count: f64,
}

impl InstrumentSnapshot {
    pub fn new(buy_volume: f64, buy_trade_count: f64, sell_volume: f64, sell_trade_count: f64) -> Self {
        Self {
            buy_volume,
            buy_trade_count,
            sell_volume,
            sell_trade_count,
        }
    }

    /// Average buy trade size over average sell trade size, with no zero guard.
    ///
    /// A zero trade count makes this NaN or infinite, and zero volume on both
    /// sides makes it NaN. Zero sell volume alone gives `+inf`.
    pub fn raw_intensity_ratio(&self) -> f64 {
        (self.buy_volume / self.buy_trade_count) / (self.sell_volume / self.sell_trade_count)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("snapshot.buy_volume", self.buy_volume),
            ("snapshot.buy_trade_count", self.buy_trade_count),
            ("snapshot.sell_volume", self.sell_volume),
            ("snapshot.sell_trade_count", self.sell_trade_count),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ScreenError::invalid(field, value));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Evaluation Context
// ============================================================================

/// Scalar inputs for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Instrument identifier, passed to the classifier
    pub symbol: String,
    /// Price change for the day (%), signed
    pub price_change_percent: f64,
    /// Volume traded so far today
    pub current_day_volume: f64,
}

impl EvaluationContext {
    pub fn new(symbol: impl Into<String>, price_change_percent: f64, current_day_volume: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price_change_percent,
            current_day_volume,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.price_change_percent.is_finite() {
            return Err(ScreenError::invalid("price_change_percent", self.price_change_percent));
        }
        if !self.current_day_volume.is_finite() || self.current_day_volume < 0.0 {
            return Err(ScreenError::invalid("current_day_volume", self.current_day_volume));
        }
        Ok(())
    }
}
