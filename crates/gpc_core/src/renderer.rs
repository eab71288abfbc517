//! In-place rendering of template files.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_json::Value;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::TemplateConfig;
use crate::engine::Template;
use crate::error::{GpcError, GpcResult};
use crate::variables::ResolvedVariables;

/// Directory name never descended into.
pub const VCS_DIR: &str = ".git";

/// Rewrites template-eligible files under a directory tree.
pub struct FileRenderer {
    patterns: Vec<Pattern>,
}

impl FileRenderer {
    /// Compile the configured glob patterns.
    pub fn new(config: &TemplateConfig) -> GpcResult<Self> {
        let patterns = config
            .templates
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| GpcError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<GpcResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Whether a file with this base name is a template.
    pub fn is_template(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    /// Render every matching file under `root` in place.
    ///
    /// Stops at the first failure; files already rewritten stay rewritten.
    pub fn render_tree(
        &self,
        root: &Path,
        variables: &ResolvedVariables,
    ) -> GpcResult<Vec<PathBuf>> {
        let mut rendered = Vec::new();
        if self.patterns.is_empty() {
            debug!("No template patterns configured, nothing to render");
            return Ok(rendered);
        }

        let context = variables.to_context();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_vcs_dir(e))
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.is_template(&name) {
                continue;
            }

            self.render_file(entry.path(), &context)?;
            debug!("Rendered: {:?}", entry.path());
            rendered.push(entry.into_path());
        }

        info!("Rendered {} template files", rendered.len());
        Ok(rendered)
    }

    fn render_file(&self, path: &Path, context: &Value) -> GpcResult<()> {
        let content = fs::read_to_string(path)?;
        let label = path.display().to_string();
        let output = Template::parse(label, &content)?.render(context)?;
        fs::write(path, output)?;
        Ok(())
    }
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == VCS_DIR
}
