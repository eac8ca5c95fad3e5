//! Momentum/volume breakout screener.
//!
//! Evaluates one instrument's snapshot against its recent daily history:
//!
//! 1. Eligibility gate (classifier)
//! 2. Trading-day volume windows (2/5/10/20 days)
//! 3. Derived ratios, zero-guarded and rounded to 2 decimals
//! 4. Pass/fail gates, short-circuiting on the first failure:
//!    price change, volume surge, buyer/seller intensity

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use zero_common::config::{BreakoutConfig, Config};
use zero_common::validation::Validate;

use crate::classify::InstrumentClassifier;
use crate::data::{validate_volumes, DailyRecord, EvaluationContext, InstrumentSnapshot};
use crate::error::{Result, ScreenError};
use crate::window::{TradingDayWindows, LONGEST_WINDOW};

// ============================================================================
// Reject Reason
// ============================================================================

/// The gate at which an instrument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Classifier rejected the instrument
    Ineligible,
    /// Price already moved more than the allowed ceiling
    PriceChangeTooHigh,
    /// Today's volume below the multiple of the 20-day average
    VolumeBelowThreshold,
    /// A trade count is zero, or both volumes are, so the intensity ratio has no value
    BuyerSellerRatioUndefined,
    /// Buyers are not trading sufficiently larger sizes than sellers
    BuyerSellerRatioTooLow,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ineligible => write!(f, "ineligible instrument"),
            Self::PriceChangeTooHigh => write!(f, "price change too high"),
            Self::VolumeBelowThreshold => write!(f, "volume below threshold"),
            Self::BuyerSellerRatioUndefined => write!(f, "buyer/seller ratio undefined"),
            Self::BuyerSellerRatioTooLow => write!(f, "buyer/seller ratio too low"),
        }
    }
}

// ============================================================================
// Score Result
// ============================================================================

/// Derived ratios, rounded to 2 decimals, `0` when a denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakoutRatios {
    /// 2-day average volume over 10-day average volume
    pub short_vs_medium_volume_ratio: f64,
    /// 5-day average volume over 20-day average volume
    pub medium_vs_long_volume_ratio: f64,
    /// Average buy trade size over average sell trade size
    pub buyer_to_seller_intensity_ratio: f64,
}

/// Verdict for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Instrument identifier
    pub symbol: String,
    /// Whether every gate passed
    pub passed: bool,
    /// Derived ratios; `None` when the instrument was ineligible
    pub ratios: Option<BreakoutRatios>,
    /// First failing gate, `None` on pass
    pub rejection: Option<RejectReason>,
}

impl ScoreResult {
    fn ineligible(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            passed: false,
            ratios: None,
            rejection: Some(RejectReason::Ineligible),
        }
    }

    fn scored(symbol: &str, ratios: BreakoutRatios, rejection: Option<RejectReason>) -> Self {
        Self {
            symbol: symbol.to_string(),
            passed: rejection.is_none(),
            ratios: Some(ratios),
            rejection,
        }
    }
}

// ============================================================================
// Ratio Helpers
// ============================================================================

/// Round to 2 decimal places from the exact binary value.
///
/// `0.425` is stored as `0.42499999…` and rounds down to `0.42`. Exact
/// halves (odd multiples of `1/8`) round up.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return (value * 100.0 + 0.5).floor() / 100.0;
    }

    format!("{value:.2}").parse().unwrap_or(value)
}

/// Ratio of per-day averages of two window sums; `0` when the long sum is zero.
pub fn window_average_ratio(short_sum: f64, short_days: usize, long_sum: f64, long_days: usize) -> f64 {
    if long_sum == 0.0 {
        return 0.0;
    }
    (short_sum / short_days as f64) / (long_sum / long_days as f64)
}

/// Buyer/seller intensity for the stored field.
///
/// `0` when either side has no volume, or when a zero trade count leaves the
/// ratio without a finite value.
pub fn guarded_intensity_ratio(snapshot: &InstrumentSnapshot) -> f64 {
    if snapshot.buy_volume == 0.0 || snapshot.sell_volume == 0.0 {
        return 0.0;
    }
    let ratio = snapshot.raw_intensity_ratio();
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

// ============================================================================
// Breakout Screener
// ============================================================================

/// Stateless momentum/volume breakout screener.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakoutScreener {
    config: BreakoutConfig,
}

impl BreakoutScreener {
    /// Create a screener with the given thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`] when a threshold is NaN, infinite,
    /// or negative where a ratio is expected.
    pub fn new(config: BreakoutConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ScreenError::InvalidConfig(e.to_string()))?;
        Ok(Self { config })
    }

    /// Create a screener from the `breakout` section of the shared config.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.breakout)
    }

    /// Active thresholds.
    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    /// Evaluate one instrument.
    ///
    /// `daily_volumes` is ordered most-recent-first and must contain at least
    /// 20 nonzero-volume days. Ineligible instruments return immediately,
    /// without validating or reading the remaining inputs.
    ///
    /// # Errors
    ///
    /// - [`ScreenError::InvalidInput`](crate::ScreenError::InvalidInput) for NaN,
    ///   infinite or negative inputs
    /// - [`ScreenError::InsufficientHistory`](crate::ScreenError::InsufficientHistory)
    ///   when history holds fewer than 20 trading days
    pub fn evaluate<C>(
        &self,
        classifier: &C,
        daily_volumes: &[f64],
        snapshot: &InstrumentSnapshot,
        ctx: &EvaluationContext,
    ) -> Result<ScoreResult>
    where
        C: InstrumentClassifier + ?Sized,
    {
        if !classifier.is_eligible(&ctx.symbol) {
            trace!(symbol = %ctx.symbol, "Instrument not eligible for breakout screening");
            return Ok(ScoreResult::ineligible(&ctx.symbol));
        }

        validate_volumes(daily_volumes)?;
        snapshot.validate()?;
        ctx.validate()?;

        let windows = TradingDayWindows::collect(daily_volumes)?;

        let ratios = BreakoutRatios {
            short_vs_medium_volume_ratio: round2(window_average_ratio(windows.vol2, 2, windows.vol10, 10)),
            medium_vs_long_volume_ratio: round2(window_average_ratio(
                windows.vol5,
                5,
                windows.vol20,
                LONGEST_WINDOW,
            )),
            buyer_to_seller_intensity_ratio: round2(guarded_intensity_ratio(snapshot)),
        };

        let rejection = self.first_failing_gate(&windows, snapshot, ctx);

        match rejection {
            None => info!(
                symbol = %ctx.symbol,
                short_vs_medium = ratios.short_vs_medium_volume_ratio,
                medium_vs_long = ratios.medium_vs_long_volume_ratio,
                intensity = ratios.buyer_to_seller_intensity_ratio,
                "Breakout candidate"
            ),
            Some(reason) => debug!(
                symbol = %ctx.symbol,
                reason = %reason,
                price_change = ctx.price_change_percent,
                current_volume = ctx.current_day_volume,
                avg20 = windows.avg20(),
                "Breakout rejected"
            ),
        }

        Ok(ScoreResult::scored(&ctx.symbol, ratios, rejection))
    }

    /// Evaluate using daily records instead of raw volumes.
    pub fn evaluate_records<C>(
        &self,
        classifier: &C,
        records: &[DailyRecord],
        snapshot: &InstrumentSnapshot,
        ctx: &EvaluationContext,
    ) -> Result<ScoreResult>
    where
        C: InstrumentClassifier + ?Sized,
    {
        let volumes: Vec<f64> = records.iter().map(|r| r.total_volume).collect();
        self.evaluate(classifier, &volumes, snapshot, ctx)
    }

    fn first_failing_gate(
        &self,
        windows: &TradingDayWindows,
        snapshot: &InstrumentSnapshot,
        ctx: &EvaluationContext,
    ) -> Option<RejectReason> {
        if ctx.price_change_percent > self.config.max_price_change_percent {
            return Some(RejectReason::PriceChangeTooHigh);
        }

        if ctx.current_day_volume
            < self.config.volume_ratio_threshold * windows.vol20 / LONGEST_WINDOW as f64
        {
            return Some(RejectReason::VolumeBelowThreshold);
        }

        // Recomputed without the zero guard used for the stored field.
        // +inf (no sell volume) is a value and passes the floor below.
        let intensity = snapshot.raw_intensity_ratio();
        if snapshot.buy_trade_count == 0.0
            || snapshot.sell_trade_count == 0.0
            || intensity.is_nan()
        {
            return Some(RejectReason::BuyerSellerRatioUndefined);
        }
        if intensity < self.config.min_buyer_seller_ratio {
            return Some(RejectReason::BuyerSellerRatioTooLow);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn eligible(_: &str) -> bool {
        true
    }

    fn flat_history() -> Vec<f64> {
        vec![1000.0; 20]
    }

    fn strong_snapshot() -> InstrumentSnapshot {
        InstrumentSnapshot::new(300.0, 10.0, 50.0, 10.0)
    }

    fn evaluate(snapshot: InstrumentSnapshot, price_change: f64, current_volume: f64) -> ScoreResult {
        let ctx = EvaluationContext::new("005930", price_change, current_volume);
        BreakoutScreener::default()
            .evaluate(&eligible, &flat_history(), &snapshot, &ctx)
            .unwrap()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(6.0), 6.0);
        assert_eq!(round2(0.0), 0.0);
        // Nearest doubles sit just below the half
        assert_eq!(round2(0.425), 0.42);
        assert_eq!(round2(1.005), 1.0);
        // Exact halves round up
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.375), 2.38);
    }

    #[test]
    fn test_intensity_field_rounds_from_exact_value() {
        // 17 / 40 = 0.425 in decimal, 0.42499999… in binary
        let result = evaluate(InstrumentSnapshot::new(170.0, 10.0, 400.0, 10.0), 1.0, 2500.0);
        assert_eq!(result.ratios.unwrap().buyer_to_seller_intensity_ratio, 0.42);
    }

    #[test]
    fn test_window_ratio_zero_guard() {
        assert_eq!(window_average_ratio(500.0, 2, 0.0, 10), 0.0);
        assert_eq!(window_average_ratio(0.0, 5, 0.0, 20), 0.0);
        assert!((window_average_ratio(400.0, 2, 1000.0, 10) - 2.0).abs() < 1e-12);
    }

    #[test_case(0.0, 10.0, 50.0, 10.0 ; "no buy volume")]
    #[test_case(300.0, 10.0, 0.0, 10.0 ; "no sell volume")]
    #[test_case(300.0, 0.0, 50.0, 10.0 ; "no buy trades")]
    #[test_case(300.0, 10.0, 50.0, 0.0 ; "no sell trades")]
    fn test_guarded_intensity_is_zero(bv: f64, bc: f64, sv: f64, sc: f64) {
        let snapshot = InstrumentSnapshot::new(bv, bc, sv, sc);
        assert_eq!(guarded_intensity_ratio(&snapshot), 0.0);
    }

    #[test]
    fn test_price_change_boundary() {
        let at_ceiling = evaluate(strong_snapshot(), 2.0, 2500.0);
        assert!(at_ceiling.passed);

        let above = evaluate(strong_snapshot(), 2.01, 2500.0);
        assert!(!above.passed);
        assert_eq!(above.rejection, Some(RejectReason::PriceChangeTooHigh));
    }

    #[test]
    fn test_volume_boundary() {
        // vol20 = 20000, threshold = 2 * 20000 / 20 = 2000
        assert!(evaluate(strong_snapshot(), 1.0, 2000.0).passed);

        let below = evaluate(strong_snapshot(), 1.0, 1999.99);
        assert_eq!(below.rejection, Some(RejectReason::VolumeBelowThreshold));
    }

    #[test]
    fn test_buyer_seller_boundary() {
        // 30 / 10 = 3.0 exactly
        let exact = evaluate(InstrumentSnapshot::new(300.0, 10.0, 100.0, 10.0), 1.0, 2500.0);
        assert!(exact.passed);

        let low = evaluate(InstrumentSnapshot::new(290.0, 10.0, 100.0, 10.0), 1.0, 2500.0);
        assert_eq!(low.rejection, Some(RejectReason::BuyerSellerRatioTooLow));
        assert_eq!(low.ratios.unwrap().buyer_to_seller_intensity_ratio, 2.9);
    }

    #[test]
    fn test_zero_trade_count_fails_gate_but_field_is_zero() {
        let result = evaluate(InstrumentSnapshot::new(300.0, 0.0, 50.0, 10.0), 1.0, 2500.0);
        assert!(!result.passed);
        assert_eq!(result.rejection, Some(RejectReason::BuyerSellerRatioUndefined));
        assert_eq!(result.ratios.unwrap().buyer_to_seller_intensity_ratio, 0.0);
    }

    #[test]
    fn test_no_sell_volume_passes_gate_with_zero_field() {
        // Average sell size is 0, so the raw ratio is +inf, which clears the floor
        let result = evaluate(InstrumentSnapshot::new(300.0, 10.0, 0.0, 10.0), 1.0, 2500.0);
        assert!(result.passed);
        assert_eq!(result.ratios.unwrap().buyer_to_seller_intensity_ratio, 0.0);
    }

    #[test]
    fn test_no_volume_either_side_is_undefined() {
        let result = evaluate(InstrumentSnapshot::new(0.0, 10.0, 0.0, 10.0), 1.0, 2500.0);
        assert_eq!(result.rejection, Some(RejectReason::BuyerSellerRatioUndefined));
    }

    #[test]
    fn test_ineligible_skips_validation() {
        let ctx = EvaluationContext::new("KODEX 200", f64::NAN, -1.0);
        let result = BreakoutScreener::default()
            .evaluate(&|_: &str| false, &[], &strong_snapshot(), &ctx)
            .unwrap();

        assert!(!result.passed);
        assert!(result.ratios.is_none());
        assert_eq!(result.rejection, Some(RejectReason::Ineligible));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let ctx = EvaluationContext::new("005930", 1.0, 2500.0);
        let mut volumes = flat_history();
        volumes[4] = f64::NAN;

        let err = BreakoutScreener::default()
            .evaluate(&eligible, &volumes, &strong_snapshot(), &ctx)
            .unwrap_err();
        assert!(matches!(err, ScreenError::InvalidInput { ref field, .. } if field == "daily_volumes[4]"));
    }

    #[test]
    fn test_custom_thresholds() {
        let screener = BreakoutScreener::new(BreakoutConfig {
            volume_ratio_threshold: 1.0,
            max_price_change_percent: 5.0,
            min_buyer_seller_ratio: 7.0,
        })
        .unwrap();
        assert!((screener.config().min_buyer_seller_ratio - 7.0).abs() < f64::EPSILON);

        let ctx = EvaluationContext::new("005930", 4.0, 1200.0);
        let result = screener
            .evaluate(&eligible, &flat_history(), &strong_snapshot(), &ctx)
            .unwrap();
        // Price and volume gates pass under looser limits; ratio 6 < 7
        assert_eq!(result.rejection, Some(RejectReason::BuyerSellerRatioTooLow));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.breakout.max_price_change_percent = 1.5;
        let screener = BreakoutScreener::from_config(&config).unwrap();
        assert!((screener.config().max_price_change_percent - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let mut config = Config::default();
        config.breakout.min_buyer_seller_ratio = f64::NAN;

        let err = BreakoutScreener::from_config(&config).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(ref msg) if msg.contains("min_buyer_seller_ratio")));
    }

    #[test]
    fn test_reject_reason_serialization() {
        let json = serde_json::to_string(&RejectReason::VolumeBelowThreshold).unwrap();
        assert_eq!(json, "\"volume_below_threshold\"");
        assert_eq!(RejectReason::PriceChangeTooHigh.to_string(), "price change too high");
    }
}
