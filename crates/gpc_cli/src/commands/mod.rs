//! CLI argument definitions.
//!
//! gpc has a single default command: pick a template source, optionally
//! pass data, and name the destination directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gpc_core::{GitReference, InputMode, TemplateSource, TemplateSourceSpec};

pub mod create;

/// gpc - git project creator
#[derive(Parser, Debug)]
#[command(name = "gpc")]
#[command(
    version,
    about = "Create a new project from a git repository, directory or tarball template"
)]
#[command(long_about = r#"
gpc fetches a template, asks for the variables it declares in .gpc.yml
(or .gpc.yaml), and renders the matching files into a new project.

TEMPLATE SOURCES (exactly one):
  --repo       git repository to clone (with --branch, --tag or --commit)
  --existing   local directory to copy
  --download   tarball URL (.tar.gz, .tar.xz, .tar.bz2)

EXIT CODES:
  0 - Success
  1 - Project creation failed
  2 - Invalid arguments
"#)]
pub struct Cli {
    /// Git repository URL to clone
    #[arg(short = 'r', long)]
    pub repo: Option<String>,

    /// Git branch to clone
    #[arg(short = 'b', long, requires = "repo")]
    pub branch: Option<String>,

    /// Git tag to clone
    #[arg(short = 't', long, requires = "repo")]
    pub tag: Option<String>,

    /// Git commit to clone
    #[arg(short = 'c', long, requires = "repo")]
    pub commit: Option<String>,

    /// Existing directory to be used as a template
    #[arg(short = 'e', long)]
    pub existing: Option<PathBuf>,

    /// URL to download the template from (tar.gz, tar.xz or tar.bz2)
    #[arg(short = 'u', long)]
    pub download: Option<String>,

    /// Data for the template in JSON or YAML format
    #[arg(short = 'D', long)]
    pub data: Option<String>,

    /// Destination directory for the new project
    /// (defaults to the repository, directory or archive name)
    #[arg(short = 'd', long)]
    pub dir: Option<PathBuf>,

    /// Overwrite the destination directory if it exists
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Never prompt; use inline data or declared defaults
    #[arg(long)]
    pub no_prompt: bool,

    /// Parse prompt answers to the type of the variable's default
    #[arg(long)]
    pub typed_input: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Whether any template source flag was given.
    pub fn has_source(&self) -> bool {
        self.repo.is_some() || self.existing.is_some() || self.download.is_some()
    }

    pub fn source_spec(&self) -> TemplateSourceSpec {
        TemplateSourceSpec {
            git: self.repo.as_ref().map(|url| GitReference {
                url: url.clone(),
                branch: self.branch.clone(),
                tag: self.tag.clone(),
                commit: self.commit.clone(),
            }),
            directory: self.existing.clone(),
            download_url: self.download.clone(),
        }
    }

    /// The `--dir` value, or a directory named after the template source.
    pub fn destination(&self, source: &TemplateSource) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        source.project_name().map(PathBuf::from).with_context(|| {
            format!("Cannot derive a project directory from {}; pass --dir", source)
        })
    }

    pub fn input_mode(&self) -> InputMode {
        if self.typed_input {
            InputMode::MatchDefault
        } else {
            InputMode::Text
        }
    }
}
