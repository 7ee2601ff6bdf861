//! Layout of the source project: what gets converted and what is copied.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PathError;

pub const IGNORE_FILE: &str = ".mina_i18n_ignore";

/// Entries every mina project has at its root.
const REQUIRED_FILES: [&str; 2] = ["app.js", "app.json"];
const PAGES_DIR: &str = "pages";

#[derive(Debug, Default, Deserialize)]
struct IgnoreFile {
    #[serde(default)]
    ignore_list: Vec<String>,
}

/// A validated source project together with its conversion scope.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub destination: PathBuf,
    /// Absolute paths of the top-level entries to convert
    includes: Vec<PathBuf>,
    /// Absolute paths that are copied even when inside an included entry
    ignored: Vec<PathBuf>,
}

impl Project {
    /// Checks the source and destination layout. Nothing is written here,
    /// so a failed check leaves the file system untouched.
    pub fn open(config: &Config) -> Result<Self, PathError> {
        let root = absolute(&config.source);
        let destination = absolute(&config.destination);

        if !root.is_dir() {
            return Err(PathError::SourceMissing(root));
        }
        for file in REQUIRED_FILES {
            if !root.join(file).is_file() {
                return Err(PathError::NotAProject {
                    root,
                    missing: file,
                });
            }
        }
        if !root.join(PAGES_DIR).is_dir() {
            return Err(PathError::NotAProject {
                root,
                missing: PAGES_DIR,
            });
        }
        if destination.starts_with(&root) {
            return Err(PathError::DestinationInsideSource {
                project: root,
                destination,
            });
        }
        if !is_empty_or_missing(&destination) {
            return Err(PathError::DestinationNotEmpty(destination));
        }

        let mut includes = vec![root.join(PAGES_DIR), root.join("app.js")];
        for entry in &config.include_paths {
            let path = root.join(entry);
            if !path.exists() {
                warn!(path = %path.display(), "include path does not exist, skipping it");
            } else if !includes.contains(&path) {
                includes.push(path);
            }
        }

        let ignored = load_ignore_list(&root);
        info!(
            root = %root.display(),
            includes = includes.len(),
            ignored = ignored.len(),
            "opened mina project"
        );

        Ok(Project {
            root,
            destination,
            includes,
            ignored,
        })
    }

    pub fn is_included(&self, path: &Path) -> bool {
        self.includes.iter().any(|include| include == path)
    }

    /// True for ignored paths and everything below them.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.iter().any(|ignored| path.starts_with(ignored))
    }

    /// Maps a path inside the project to its place in the output.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(relative) => self.destination.join(relative),
            Err(_) => self.destination.join(path),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_empty_or_missing(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !path.exists(),
    }
}

fn load_ignore_list(root: &Path) -> Vec<PathBuf> {
    let path = root.join(IGNORE_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };
    match serde_json::from_str::<IgnoreFile>(&content) {
        Ok(file) => file
            .ignore_list
            .iter()
            .map(|entry| root.join(entry.trim_start_matches("./")))
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed ignore file, ignoring nothing");
            Vec::new()
        }
    }
}
