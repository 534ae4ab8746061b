//! Air quality assessment kernel.
//!
//! This crate implements the computation pipeline that turns raw sensor
//! measurements into an air quality assessment: breakpoint index
//! calculation, pollutant normalization, composite AQI aggregation,
//! rule-based cause inference, risk scoring, and a TTL result cache.
//! Everything here is synchronous and free of I/O; fetching measurements
//! and serving results live in the service crate.

pub mod aggregate;
pub mod breakpoints;
pub mod cache;
pub mod config;
pub mod profile;
pub mod reasoning;
pub mod result;
pub mod risk;

pub use aggregate::{aggregate, AqiResult};
pub use breakpoints::{sub_index, Breakpoint, Category, Pollutant, SubIndex};
pub use cache::{Clock, ResultCache, SystemClock};
pub use config::PipelineConfig;
pub use profile::{normalize_measurements, Measurement, PollutantProfile, WIND_SPEED};
pub use reasoning::{infer_reasons, ReasoningResult};
pub use result::{FetchMeta, PipelineResult};
pub use risk::{score_risk, RiskLevel, RiskResult};
