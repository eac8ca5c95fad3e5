//! Zero Breakout - momentum/volume breakout screener for the Zero ecosystem.
//!
//! Decides whether an instrument qualifies as a breakout candidate from its
//! daily volume history and today's buy/sell aggregates.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Classifier   │──▶│ Trading-day      │──▶│ Ratios       │──▶│ Gates        │
//! │ (eligible?)  │   │ windows 2/5/10/20│   │ (rounded)    │   │ price/vol/BS │
//! └──────────────┘   └──────────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use zero_breakout::{BreakoutScreener, EvaluationContext, InstrumentSnapshot, SuffixClassifier};
//!
//! let screener = BreakoutScreener::default();
//! let snapshot = InstrumentSnapshot::new(300.0, 10.0, 50.0, 10.0);
//! let ctx = EvaluationContext::new("005930", 1.0, 150.0);
//!
//! let result = screener.evaluate(&SuffixClassifier::default(), &volumes, &snapshot, &ctx)?;
//! if result.passed {
//!     // candidate
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod classify;
pub mod data;
pub mod error;
pub mod screener;
pub mod window;

pub use classify::{InstrumentClassifier, SuffixClassifier};
pub use data::{DailyRecord, EvaluationContext, InstrumentSnapshot};
pub use error::{Result, ScreenError};
pub use screener::{BreakoutRatios, BreakoutScreener, RejectReason, ScoreResult};
pub use window::{volume_over_trading_days, TradingDayWindows};
pub use zero_common::config::BreakoutConfig;
