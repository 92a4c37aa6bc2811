use anyhow::Context;
use clap::Parser;
use skd_redate::domain::ports::Pipeline;
use skd_redate::utils::error::{ErrorSeverity, RedateError};
use skd_redate::utils::{logger, validation::Validate};
use skd_redate::{
    Approach, CliConfig, GmstPipeline, LocalStorage, RedateEngine, RedateReport, RotatePipeline,
    SkyPipeline, TomlConfig,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let mut settings = match &config.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => TomlConfig::default(),
    };
    config.apply_overrides(&mut settings);

    // 初始化日誌
    logger::init_cli_logger(
        config.verbose,
        settings.logging.level.as_deref(),
        settings.log_format(),
        settings.logging.file.as_deref(),
    )
    .context("failed to initialise logging")?;

    tracing::info!("Starting skd-redate CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
        tracing::debug!("Settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = config.validate().and_then(|_| settings.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let target = match config.target_time() {
        Ok(target) => target,
        Err(e) => exit_with(&e),
    };

    let storage = LocalStorage::new();
    let report = config.report.as_deref();
    let outcome = match config.approach {
        Approach::Gmst => run(
            GmstPipeline::new(storage, settings, &config.skd, target.date()),
            report,
        ),
        Approach::Sky => run(SkyPipeline::new(storage, settings, &config.skd, target), report),
        Approach::Rotate => run(
            RotatePipeline::new(storage, settings, &config.skd, target),
            report,
        ),
    };

    match outcome {
        Ok(report) => {
            let output = report.output_path.as_deref().unwrap_or_default();
            tracing::info!("📁 Output saved to: {}", output);
            println!("✅ {} -> {}", report.original_start, report.new_start);
            println!("📁 Output saved to: {}", output);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn run<P: Pipeline>(pipeline: P, report: Option<&Path>) -> skd_redate::Result<RedateReport> {
    RedateEngine::new(pipeline).with_report(report).run()
}

fn exit_with(e: &RedateError) -> ! {
    tracing::error!(
        "❌ Redate failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
