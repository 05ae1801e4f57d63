//! Document directory scanning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::date::format_system_time;
use crate::error::KioskResult;
use crate::template::FileOverride;

/// Public URL prefix under which document directories are served.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/docs";

/// A document found on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedFile {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub date: String,
    pub path: String,
}

/// List the regular files of `<files_root>/<directory>`, sorted by name.
///
/// A missing directory yields no files. Overrides are matched by exact file
/// name and only ever touch files that exist.
pub fn scan_directory(
    files_root: &Path,
    directory: &str,
    overrides: &[FileOverride],
    public_prefix: &str,
) -> KioskResult<Vec<ScannedFile>> {
    let dir = files_root.join(directory);

    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "document directory missing");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        // Follows symlinks, so links to regular files are listed
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };

        let Ok(file_name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        let mut file = ScannedFile {
            date: format_system_time(metadata.modified()?),
            path: public_path(public_prefix, directory, &file_name),
            display_name: None,
            file_name,
        };

        if let Some(file_override) = overrides.iter().find(|o| o.file_name == file.file_name) {
            apply_override(&mut file, file_override);
        }

        files.push(file);
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    tracing::debug!(directory, count = files.len(), "scanned document directory");
    Ok(files)
}

fn apply_override(file: &mut ScannedFile, file_override: &FileOverride) {
    if let Some(display_name) = file_override.display_name.as_ref().filter(|s| !s.is_empty()) {
        file.display_name = Some(display_name.clone());
    }
    if let Some(date) = file_override.date.as_ref().filter(|s| !s.is_empty()) {
        file.date = date.clone();
    }
}

/// `<prefix>/<directory>/<file_name>` with single slashes between parts.
fn public_path(prefix: &str, directory: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let directory = directory.trim_matches('/');

    if directory.is_empty() {
        format!("{prefix}/{file_name}")
    } else {
        format!("{prefix}/{directory}/{file_name}")
    }
}
