//! loan-default-core: turns raw loan-transaction uploads into a numeric
//! feature table for a binary default-risk classifier, scores it, and
//! renders the results.

pub mod calendar;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rng;
pub mod sample;
pub mod schema;
pub mod scoring;
pub mod table;
pub mod transform;
pub mod types;

pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use table::{Column, Table};
pub use transform::{transform, FeatureBatch, FeatureTransform};
