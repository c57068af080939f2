//! Prediction Request Adapter
//!
//! Packages the current feature snapshot into a prediction request, sends
//! it to the external model service, and returns the parsed result. On
//! transport failure the result degrades to a fixed fallback notice
//! instead of surfacing an error to the view.

mod client;
mod features;

pub use client::{fallback_result, HttpPredictionService, PredictionClientError, PredictionService};
pub use features::build_feature_vector;
