//! `logroute validate` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use logroute_core::config::LogrouteConfig;
use logroute_router::{Container, Destination, RoutingConfig};

use crate::cli::ValidateArgs;
use crate::commands::ecs_metadata;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::task::TaskFile;

/// Execute the `validate` command.
///
/// Translates the task file and reports every container's destinations.
/// The first rejected container fails the command.
pub async fn execute(
    args: ValidateArgs,
    config: &LogrouteConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let task = TaskFile::load(&args.task_file).await?;
    let metadata = ecs_metadata(&args.metadata, &config.metadata);
    let routing = task.build(metadata)?;

    info!(
        task_file = %args.task_file.display(),
        containers = routing.containers().len(),
        "task file is valid"
    );

    writer.render(&ValidationReport::new(
        args.task_file.display().to_string(),
        &routing,
    ))
}

/// Translation summary of a task file.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub task_file: String,
    pub containers: Vec<ContainerReport>,
}

#[derive(Debug, Serialize)]
pub struct ContainerReport {
    pub name: String,
    pub multiline: bool,
    pub destinations: Vec<DestinationReport>,
}

#[derive(Debug, Serialize)]
pub struct DestinationReport {
    pub uid: String,
    #[serde(rename = "type")]
    pub destination_type: String,
    pub region: String,
    pub target: String,
    pub match_patterns: usize,
    pub exclude_patterns: usize,
}

impl ValidationReport {
    pub fn new(task_file: String, routing: &RoutingConfig) -> Self {
        Self {
            task_file,
            containers: routing.containers().iter().map(ContainerReport::from).collect(),
        }
    }
}

impl From<&Container> for ContainerReport {
    fn from(container: &Container) -> Self {
        Self {
            name: container.tag.clone(),
            multiline: container.multiline.is_some(),
            destinations: container.destinations.iter().map(DestinationReport::from).collect(),
        }
    }
}

impl From<&Destination> for DestinationReport {
    fn from(destination: &Destination) -> Self {
        Self {
            uid: destination.uid.clone(),
            destination_type: destination.output.destination_type().to_string(),
            region: destination.output.region().to_owned(),
            target: destination.output.target(),
            match_patterns: destination.filter.match_patterns.len(),
            exclude_patterns: destination.filter.exclude_patterns.len(),
        }
    }
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Task Validation: {} ({})",
            self.task_file.bold(),
            "VALID".green().bold()
        )?;

        for container in &self.containers {
            let multiline = if container.multiline { " [multiline]" } else { "" };
            writeln!(w, "  {}{}", container.name.bold(), multiline)?;
            if container.destinations.is_empty() {
                writeln!(w, "    (no destinations)")?;
            }
            for d in &container.destinations {
                writeln!(
                    w,
                    "    {:<16} {:<17} {:<14} {} (match {}, exclude {})",
                    d.uid, d.destination_type, d.region, d.target, d.match_patterns, d.exclude_patterns
                )?;
            }
        }

        Ok(())
    }
}
