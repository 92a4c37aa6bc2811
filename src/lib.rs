pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, TomlConfig};

pub use adapters::MeanSiderealClock;
pub use core::{GmstPipeline, RedateEngine, RotatePipeline, SkyPipeline};
pub use domain::model::{Approach, RedateReport, SkdTime};
pub use utils::error::{RedateError, Result};
