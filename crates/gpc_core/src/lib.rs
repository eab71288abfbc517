//! # gpc_core
//!
//! Project scaffolding from templates.
//!
//! A template is fetched from a git repository, a local directory or a
//! tarball URL into the destination directory. An optional `.gpc.yml`
//! at its root names the files to render and the variables they use.
//! Variables are resolved from inline data, interactive prompts, or
//! declared defaults, then substituted into the matching files in place.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gpc_core::{
//!     HttpTransport, ProjectCreator, ProjectOptions, StdioPrompter, SystemRunner, TemplateSource,
//! };
//!
//! let transport = HttpTransport::new().unwrap();
//! let creator = ProjectCreator::new(&SystemRunner, &transport, &StdioPrompter);
//!
//! let options = ProjectOptions::new(TemplateSource::Directory("./tpl".into()), "./out")
//!     .with_data(r#"{"Name":"Ada"}"#);
//!
//! let report = creator.create(&options).unwrap();
//! println!("rendered {} files", report.rendered_files.len());
//! ```

pub mod archive;
pub mod config;
pub mod creator;
pub mod data;
pub mod engine;
pub mod error;
pub mod mock;
pub mod renderer;
pub mod runner;
pub mod source;
pub mod transport;
pub mod variables;

pub use archive::ArchiveKind;
pub use config::{ConfigReader, TemplateConfig, VariableDeclaration, CONFIG_FILE_NAMES};
pub use creator::{CreateReport, ProjectCreator, ProjectOptions};
pub use data::{parse_data, InlineData};
pub use engine::{render_str, Template};
pub use error::{GpcError, GpcResult};
pub use mock::{CapturedCommand, MockCommandRunner};
pub use renderer::FileRenderer;
pub use runner::{CommandRunner, SystemRunner};
pub use source::{copy_directory, GitReference, SourceResolver, TemplateSource, TemplateSourceSpec};
pub use transport::{Download, HttpTransport, StaticTransport, Transport};
pub use variables::{
    InputMode, Prompter, ResolvedVariables, ScriptedPrompter, StdioPrompter, VariableResolver,
};
