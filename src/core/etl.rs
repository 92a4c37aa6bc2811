use crate::domain::model::RedateReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs a pipeline's extract → transform → load and writes the optional report.
pub struct RedateEngine<P: Pipeline> {
    pipeline: P,
    report_path: Option<PathBuf>,
}

impl<P: Pipeline> RedateEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            report_path: None,
        }
    }

    pub fn with_report<Q: Into<PathBuf>>(mut self, report_path: Option<Q>) -> Self {
        self.report_path = report_path.map(Into::into);
        self
    }

    pub fn run(&self) -> Result<RedateReport> {
        let approach = self.pipeline.approach();
        tracing::info!("🚀 Starting {} redate", approach);

        // Extract
        let document = self.pipeline.extract()?;
        tracing::info!("📥 Extracted {} schedule lines", document.len());

        // Transform
        let result = self.pipeline.transform(document)?;
        tracing::info!(
            "🔄 Transformed session start {} -> {}",
            result.report.original_start,
            result.report.new_start
        );

        // Load
        let output_path = self.pipeline.load(&result)?;

        let mut report = result.report;
        report.output_path = Some(output_path);

        if let Some(path) = &self.report_path {
            write_report(path, &report)?;
        }

        tracing::info!("✅ {} redate completed", approach);
        Ok(report)
    }
}

fn write_report(path: &Path, report: &RedateReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    tracing::info!("📊 Report written to {}", path.display());
    Ok(())
}
