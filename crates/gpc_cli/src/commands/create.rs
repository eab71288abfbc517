//! Create command - materialize a project from a template.

use anyhow::{Context, Result};
use tracing::info;

use gpc_core::{
    HttpTransport, ProjectCreator, ProjectOptions, StdioPrompter, SystemRunner, TemplateSource,
};

use super::Cli;

pub fn execute(cli: &Cli) -> Result<()> {
    let source = TemplateSource::try_from(cli.source_spec())?;

    let destination = cli.destination(&source)?;
    info!("Creating project in {:?}", destination);

    let mut options = ProjectOptions::new(source, destination)
        .overwrite(cli.overwrite)
        .interactive(!cli.no_prompt)
        .input_mode(cli.input_mode());
    if let Some(data) = &cli.data {
        options = options.with_data(data.clone());
    }

    let transport = HttpTransport::new().context("Failed to initialize HTTP client")?;
    let creator = ProjectCreator::new(&SystemRunner, &transport, &StdioPrompter);

    let report = creator.create(&options)?;
    info!(
        "Resolved {} variables, rendered {} files",
        report.variables.len(),
        report.rendered_files.len()
    );

    println!("Project successfully created!");
    Ok(())
}
