//! Project creation pipeline.
//!
//! Runs strictly in order: check destination, fetch template, read
//! config, resolve variables, render files. Any failure stops the run and
//! leaves whatever earlier steps produced on disk.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{ConfigReader, TemplateConfig};
use crate::data::parse_data;
use crate::error::{GpcError, GpcResult};
use crate::renderer::FileRenderer;
use crate::runner::CommandRunner;
use crate::source::{SourceResolver, TemplateSource};
use crate::transport::Transport;
use crate::variables::{InputMode, Prompter, ResolvedVariables, VariableResolver};

/// Everything a single run needs, fixed up front.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub source: TemplateSource,
    pub destination: PathBuf,
    pub overwrite: bool,
    pub interactive: bool,
    pub input_mode: InputMode,
    /// Inline JSON or YAML data.
    pub data: Option<String>,
}

impl ProjectOptions {
    pub fn new(source: TemplateSource, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
            overwrite: false,
            interactive: false,
            input_mode: InputMode::default(),
            data: None,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub destination: PathBuf,
    pub config: TemplateConfig,
    pub variables: ResolvedVariables,
    pub rendered_files: Vec<PathBuf>,
}

/// Creates projects from templates using injected collaborators.
pub struct ProjectCreator<'a> {
    runner: &'a dyn CommandRunner,
    transport: &'a dyn Transport,
    prompter: &'a dyn Prompter,
}

impl<'a> ProjectCreator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        transport: &'a dyn Transport,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            runner,
            transport,
            prompter,
        }
    }

    pub fn create(&self, options: &ProjectOptions) -> GpcResult<CreateReport> {
        self.check_destination(options)?;

        let data = parse_data(options.data.as_deref().unwrap_or_default())?;

        SourceResolver::new(self.runner, self.transport)
            .fetch(&options.source, &options.destination)?;

        let config = ConfigReader::new(&options.destination).read()?;

        let mut resolver = VariableResolver::new(&data).input_mode(options.input_mode);
        if options.interactive {
            resolver = resolver.interactive(self.prompter);
        }
        let variables = resolver.resolve(&config.variables)?;

        let rendered_files =
            FileRenderer::new(&config)?.render_tree(&options.destination, &variables)?;

        info!("Project created at {:?}", options.destination);
        Ok(CreateReport {
            destination: options.destination.clone(),
            config,
            variables,
            rendered_files,
        })
    }

    fn check_destination(&self, options: &ProjectOptions) -> GpcResult<()> {
        let dest = &options.destination;
        if !dest.exists() || options.overwrite {
            return Ok(());
        }

        if !options.interactive {
            return Err(GpcError::DestinationExists(dest.clone()));
        }

        let answer = self.prompter.ask(&format!(
            "Directory {} already exists. Do you want to overwrite it? (y/n): ",
            dest.display()
        ))?;
        if answer.trim().eq_ignore_ascii_case("y") {
            warn!("Writing into existing directory {:?}", dest);
            Ok(())
        } else {
            Err(GpcError::DestinationExists(dest.clone()))
        }
    }
}
