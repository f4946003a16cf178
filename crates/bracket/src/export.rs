//! Writing a rendered bracket to disk.
//!
//! A failed write is retried once under the fallback directory with the same
//! file name before the export is reported as failed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export to {path} failed: {source}")]
    Primary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("export failed at {primary} ({primary_error}) and at fallback {fallback}: {source}")]
    Fallback {
        primary: PathBuf,
        primary_error: io::Error,
        fallback: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }
}

/// Default export file name for a competition, e.g. `spring_cup_bracket.html`
pub fn export_file_name(competition_name: &str, format: ExportFormat) -> String {
    let mut stem: String = competition_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    while stem.contains("__") {
        stem = stem.replace("__", "_");
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        return format!("bracket.{}", format.extension());
    }
    format!("{}_bracket.{}", stem, format.extension())
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}

/// Writes `content` to `path`, falling back to `fallback_dir` once.
///
/// `on_retry` is called with the fallback path before the second attempt.
/// Returns the path actually written.
pub fn export(
    content: &str,
    path: &Path,
    fallback_dir: &Path,
    mut on_retry: impl FnMut(&Path),
) -> Result<PathBuf, ExportError> {
    let primary_error = match write_file(path, content) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "exported bracket");
            return Ok(path.to_path_buf());
        }
        Err(e) => e,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "bracket_export.txt".into());
    let fallback = fallback_dir.join(file_name);
    if fallback == path {
        return Err(ExportError::Primary {
            path: path.to_path_buf(),
            source: primary_error,
        });
    }

    tracing::warn!(
        path = %path.display(),
        error = %primary_error,
        fallback = %fallback.display(),
        "export failed, retrying in fallback directory"
    );
    on_retry(&fallback);

    match write_file(&fallback, content) {
        Ok(()) => Ok(fallback),
        Err(source) => Err(ExportError::Fallback {
            primary: path.to_path_buf(),
            primary_error,
            fallback,
            source,
        }),
    }
}
