//! `logroute render` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use logroute_core::config::LogrouteConfig;
use logroute_router::{FluentdTemplate, TemplateFile, TemplateSource, render_to_string};

use crate::cli::RenderArgs;
use crate::commands::ecs_metadata;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::task::TaskFile;

/// Execute the `render` command.
///
/// Without an output path the rendered config itself is the command output.
/// With one, the file is written and a short summary is reported.
pub async fn execute(
    args: RenderArgs,
    config: &LogrouteConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let task = TaskFile::load(&args.task_file).await?;
    let metadata = ecs_metadata(&args.metadata, &config.metadata);
    let routing = task.build(metadata)?;

    let template = resolve_template(args.template, config)?;
    let rendered = render_to_string(&routing, &template);

    let out = args
        .out
        .or_else(|| non_empty_path(&config.render.output_path));

    let report = match out {
        Some(path) => {
            tokio::fs::write(&path, rendered.as_bytes()).await?;
            info!(
                path = %path.display(),
                containers = routing.containers().len(),
                destinations = routing.destination_count(),
                "fluentd config written"
            );
            RenderReport {
                task_file: args.task_file.display().to_string(),
                output: Some(path.display().to_string()),
                containers: routing.containers().len(),
                destinations: routing.destination_count(),
                config: None,
            }
        }
        None => RenderReport {
            task_file: args.task_file.display().to_string(),
            output: None,
            containers: routing.containers().len(),
            destinations: routing.destination_count(),
            config: Some(rendered),
        },
    };

    writer.render(&report)
}

/// Template precedence: `--template`, then `[render].template_path`, then the built-in
/// layout. `[render].socket_path` applies unless the template file sets its own.
pub fn resolve_template(
    flag: Option<PathBuf>,
    config: &LogrouteConfig,
) -> Result<FluentdTemplate, CliError> {
    match flag.or_else(|| non_empty_path(&config.render.template_path)) {
        Some(path) => Ok(TemplateFile::new(path)
            .with_socket_path(config.render.socket_path.as_str())
            .load()?),
        None => Ok(FluentdTemplate::default().with_socket_path(config.render.socket_path.as_str())),
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

/// Result of a render.
#[derive(Serialize)]
pub struct RenderReport {
    pub task_file: String,
    /// Written file, `None` when the config went to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub containers: usize,
    pub destinations: usize,
    /// Rendered text when no output file was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl Render for RenderReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match (&self.config, &self.output) {
            (Some(config), _) => write!(w, "{config}"),
            (None, Some(path)) => writeln!(
                w,
                "{} {} containers, {} destinations -> {}",
                "Rendered".green().bold(),
                self.containers,
                self.destinations,
                path.bold()
            ),
            (None, None) => Ok(()),
        }
    }
}
