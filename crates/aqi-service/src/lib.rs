//! Air quality assessment service.
//!
//! Wires the computation kernel to the outside world: the measurement
//! provider client, the static area metadata table, the pipeline
//! orchestrator with its cache and radius-expansion retry, and the
//! advisory text client.

pub mod advisory;
pub mod areas;
pub mod fetch;
pub mod openaq;
pub mod pipeline;

pub use advisory::{AdvisoryClient, UserRole, WeatherSnapshot};
pub use areas::{lookup_area, AreaInfo, AREAS};
pub use fetch::{FetchBatch, FetchError, MeasurementFetcher};
pub use openaq::OpenAqClient;
pub use pipeline::{AirQualityPipeline, PipelineError, PipelineOutcome};
