pub mod etl;
pub mod gmst_pipeline;
pub mod pipeline;
pub mod rotate_pipeline;
pub mod sky_pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::RedateReport;
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TransformResult};
pub use crate::utils::error::Result;
pub use etl::RedateEngine;
pub use gmst_pipeline::GmstPipeline;
pub use rotate_pipeline::RotatePipeline;
pub use sky_pipeline::SkyPipeline;
