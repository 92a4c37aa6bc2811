use crate::config::toml_config::TomlConfig;
use crate::domain::model::Approach;
use crate::domain::services::rotator::TurnaroundAction;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "skd-redate")]
#[command(about = "Re-date a VLBI .skd schedule to a new start date or time")]
pub struct CliConfig {
    /// Schedule file to redate
    #[arg(short = 's', long)]
    pub skd: PathBuf,

    /// New start, UTC: yyyy-mm-dd or yyyy-mm-ddThh:mm:ss
    #[arg(short = 't', long)]
    pub time: String,

    #[arg(short = 'a', long, value_enum)]
    pub approach: Approach,

    /// Optional TOML settings file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(short = 'l', long)]
    pub log_file: Option<PathBuf>,

    /// Write a JSON diagnostics report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Fail rotate runs whose turnaround is below the configured minimum")]
    pub reject_short_turnaround: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn target_time(&self) -> Result<NaiveDateTime> {
        validation::parse_target_time(&self.time)
    }

    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, settings: &mut TomlConfig) {
        if let Some(log_file) = &self.log_file {
            settings.logging.file = Some(log_file.clone());
        }
        if self.json_logs {
            settings.logging.format = Some("json".to_string());
        }
        if self.reject_short_turnaround {
            settings.rotation.on_insufficient_turnaround = TurnaroundAction::Reject;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("skd", &self.skd.to_string_lossy())?;
        self.target_time()?;
        if let Some(report) = &self.report {
            validation::validate_path("report", &report.to_string_lossy())?;
        }
        Ok(())
    }
}
