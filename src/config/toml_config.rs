use crate::domain::model::Approach;
use crate::domain::ports::ConfigProvider;
use crate::domain::services::rotator::{TurnaroundAction, TurnaroundPolicy};
use crate::utils::error::{RedateError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

/// Settings file. Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub output: OutputConfig,
    pub rotation: RotationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where redated files go; the input file's directory when unset.
    pub directory: Option<PathBuf>,
    pub gmst_suffix: String,
    pub sky_suffix: String,
    pub rotate_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            gmst_suffix: "_gmst".to_string(),
            sky_suffix: "_sky".to_string(),
            rotate_suffix: "_rot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub min_turnaround_seconds: f64,
    pub on_insufficient_turnaround: TurnaroundAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RedateError::ConfigError {
                message: format!("settings file not found: {}", path.display()),
            },
            _ => RedateError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RedateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_REGEX.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_suffix("output.gmst_suffix", &self.output.gmst_suffix)?;
        validation::validate_suffix("output.sky_suffix", &self.output.sky_suffix)?;
        validation::validate_suffix("output.rotate_suffix", &self.output.rotate_suffix)?;

        if let Some(directory) = &self.output.directory {
            validation::validate_path("output.directory", &directory.to_string_lossy())?;
        }

        validation::validate_range(
            "rotation.min_turnaround_seconds",
            self.rotation.min_turnaround_seconds,
            0.0,
            86_400.0,
        )?;

        if let Some(level) = &self.logging.level {
            validation::validate_one_of(
                "logging.level",
                level,
                &["trace", "debug", "info", "warn", "error"],
            )?;
        }
        if let Some(format) = &self.logging.format {
            validation::validate_one_of("logging.format", format, &["compact", "json"])?;
        }
        if let Some(file) = &self.logging.file {
            validation::validate_path("logging.file", &file.to_string_lossy())?;
        }

        Ok(())
    }

    pub fn log_format(&self) -> LogFormat {
        match self.logging.format.as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn output_suffix(&self, approach: Approach) -> &str {
        match approach {
            Approach::Gmst => &self.output.gmst_suffix,
            Approach::Sky => &self.output.sky_suffix,
            Approach::Rotate => &self.output.rotate_suffix,
        }
    }

    fn output_directory(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }

    fn turnaround_policy(&self) -> TurnaroundPolicy {
        TurnaroundPolicy {
            min_seconds: self.rotation.min_turnaround_seconds,
            action: self.rotation.on_insufficient_turnaround,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.output_suffix(Approach::Gmst), "_gmst");
        assert_eq!(config.output_suffix(Approach::Sky), "_sky");
        assert_eq!(config.output_suffix(Approach::Rotate), "_rot");
        assert!(config.output_directory().is_none());
        assert_eq!(config.turnaround_policy(), TurnaroundPolicy::default());
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[output]
directory = "./redated"
rotate_suffix = "_rotated"

[rotation]
min_turnaround_seconds = 120
on_insufficient_turnaround = "reject"

[logging]
level = "debug"
format = "json"
file = "logs/redate.log"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output_directory(), Some(Path::new("./redated")));
        assert_eq!(config.output_suffix(Approach::Rotate), "_rotated");
        assert_eq!(config.output_suffix(Approach::Gmst), "_gmst");
        assert_eq!(
            config.turnaround_policy(),
            TurnaroundPolicy {
                min_seconds: 120.0,
                action: TurnaroundAction::Reject,
            }
        );
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/redate.log")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SKD_REDATE_TEST_OUTPUT_DIR", "/tmp/skd-out");

        let toml_content = r#"
[output]
directory = "${SKD_REDATE_TEST_OUTPUT_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_directory(), Some(Path::new("/tmp/skd-out")));

        std::env::remove_var("SKD_REDATE_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_unknown_turnaround_action_fails_to_parse() {
        let toml_content = r#"
[rotation]
on_insufficient_turnaround = "ignore"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(RedateError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let bad_suffix = TomlConfig::from_toml_str("[output]\ngmst_suffix = \"../x\"\n").unwrap();
        assert!(bad_suffix.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());

        let negative =
            TomlConfig::from_toml_str("[rotation]\nmin_turnaround_seconds = -5.0\n").unwrap();
        assert!(matches!(
            negative.validate(),
            Err(RedateError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nsky_suffix = \"_newsky\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_suffix(Approach::Sky), "_newsky");
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            TomlConfig::from_file("/definitely/not/here.toml"),
            Err(RedateError::ConfigError { .. })
        ));
    }
}
