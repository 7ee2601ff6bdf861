//! Walks the project and sends every file to the matching rewriter.
//!
//! Files are processed one at a time. After each file the translation queue
//! picks up whatever the rewriter recorded, so requests overlap with the
//! rest of the walk while the walk itself never waits on the network.

use std::fs;
use std::path::{Path, PathBuf};

use mina_i18n::{
    Dictionary, Runtime, ScriptOptions, TemplateOptions, rewrite_script, rewrite_template,
    runtime_src,
};
use mina_i18n_mt::TranslationQueue;
use tracing::{debug, warn};

use crate::error::{CliError, PathError};
use crate::project::Project;
use crate::walker::{copy_recursive, list_dir};

/// What happened to the files of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scripts: usize,
    pub templates: usize,
    pub copied: usize,
    /// Scripts that could not be parsed. Nothing is written for them.
    pub failed: Vec<PathBuf>,
    /// Templates that could not be parsed and were copied as they are
    pub copied_templates: Vec<PathBuf>,
}

pub struct Processor<'a> {
    project: &'a Project,
    runtime: &'a Runtime,
    script_options: ScriptOptions,
    dictionary: &'a mut Dictionary,
    queue: &'a mut TranslationQueue,
    pub report: RunReport,
}

impl<'a> Processor<'a> {
    pub fn new(
        project: &'a Project,
        runtime: &'a Runtime,
        script_options: ScriptOptions,
        dictionary: &'a mut Dictionary,
        queue: &'a mut TranslationQueue,
    ) -> Self {
        Processor {
            project,
            runtime,
            script_options,
            dictionary,
            queue,
            report: RunReport::default(),
        }
    }

    /// Mirrors the project into its destination, converting included entries
    /// and copying everything else.
    pub fn convert_project(&mut self) -> Result<(), CliError> {
        fs::create_dir_all(&self.project.destination)?;
        for entry in list_dir(&self.project.root)? {
            if !self.project.is_included(&entry) {
                self.copy(&entry)?;
            } else if entry.is_dir() {
                self.convert_dir(&entry, 1)?;
            } else {
                self.convert_file(&entry, 0)?;
            }
        }
        Ok(())
    }

    /// `depth` is the number of directories between the output root and the
    /// files directly inside `dir`.
    fn convert_dir(&mut self, dir: &Path, depth: usize) -> Result<(), CliError> {
        if self.project.is_ignored(dir) {
            return self.copy(dir);
        }
        fs::create_dir_all(self.project.output_path(dir))?;
        for entry in list_dir(dir)? {
            if entry.is_dir() {
                self.convert_dir(&entry, depth + 1)?;
            } else {
                self.convert_file(&entry, depth)?;
            }
        }
        Ok(())
    }

    fn convert_file(&mut self, path: &Path, depth: usize) -> Result<(), CliError> {
        if self.project.is_ignored(path) {
            return self.copy(path);
        }
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if extension != "js" && extension != "wxml" {
            return self.copy(path);
        }
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(path = %path.display(), "file is not UTF-8, copying it");
                return self.copy(path);
            }
            Err(e) => return Err(e.into()),
        };

        if extension == "js" {
            self.convert_script(path, &source)?;
        } else {
            self.convert_template(path, &source, depth)?;
        }
        self.queue.dispatch(self.dictionary);
        Ok(())
    }

    fn convert_script(&mut self, path: &Path, source: &str) -> Result<(), CliError> {
        match rewrite_script(source, self.runtime, &self.script_options, self.dictionary) {
            Ok(output) => {
                self.write(path, &output)?;
                self.report.scripts += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not parse script, skipping it");
                self.report.failed.push(path.to_path_buf());
            }
        }
        Ok(())
    }

    fn convert_template(
        &mut self,
        path: &Path,
        source: &str,
        depth: usize,
    ) -> Result<(), CliError> {
        let options = TemplateOptions {
            runtime_src: Some(runtime_src(self.runtime, depth)),
        };
        match rewrite_template(source, self.runtime, &options, self.dictionary) {
            Ok(output) => {
                self.write(path, &output)?;
                self.report.templates += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not parse template, copying it");
                self.report.copied_templates.push(path.to_path_buf());
                self.copy(path)?;
            }
        }
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), CliError> {
        let target = self.claim(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %target.display(), "writing converted file");
        fs::write(target, content)?;
        Ok(())
    }

    fn copy(&mut self, path: &Path) -> Result<(), CliError> {
        let target = self.claim(path)?;
        self.report.copied += copy_recursive(path, &target)?;
        Ok(())
    }

    /// Output path for `path`, refusing to overwrite anything already there.
    fn claim(&self, path: &Path) -> Result<PathBuf, PathError> {
        let target = self.project.output_path(path);
        if target.exists() {
            return Err(PathError::Collision(target));
        }
        Ok(target)
    }
}

impl std::fmt::Debug for Processor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("root", &self.project.root)
            .field("report", &self.report)
            .finish()
    }
}
