//! Extract and load steps shared by the gmst, sky and rotate pipelines.

use crate::domain::model::Approach;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::domain::services::schedule::ScheduleDocument;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// `<dir>/<stem><suffix>.<ext>`, where `dir` defaults to the input's directory.
pub fn output_path_for(input: &Path, suffix: &str, directory: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file_name = format!("{}{}", stem, suffix);
    if let Some(ext) = input.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }

    let dir = match directory {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(file_name)
}

pub(crate) fn read_schedule<S: Storage>(storage: &S, path: &Path) -> Result<ScheduleDocument> {
    tracing::info!("📥 Reading schedule {}", path.display());
    let bytes = storage.read_file(path)?;
    let document = ScheduleDocument::from_bytes(&bytes)?;
    tracing::debug!("Read {} lines from {}", document.len(), path.display());
    Ok(document)
}

pub(crate) fn write_schedule<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    approach: Approach,
    input: &Path,
    document: &ScheduleDocument,
) -> Result<String> {
    let path = output_path_for(
        input,
        config.output_suffix(approach),
        config.output_directory(),
    );
    storage.write_file(&path, document.to_text().as_bytes())?;
    tracing::info!("💾 Wrote redated schedule to {}", path.display());
    Ok(path.display().to_string())
}
