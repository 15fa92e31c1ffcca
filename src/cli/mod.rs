//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for one subcommand and returns the
//! process exit code.

mod batch;
mod inputs;
mod predict;
mod status;
mod validate;

pub use batch::{run_batch, BatchConfig};
pub use inputs::{features_from_value, load_feature_batch, load_features, location_from};
pub use predict::{load_price_history, run_predict, run_price, PredictConfig, PriceCommand, PriceMethod};
pub use status::{run_status, run_train};
pub use validate::{read_record, run_validate, ValidateConfig};

// Re-export config types used by handlers
pub use crate::config::OutputConfig;
