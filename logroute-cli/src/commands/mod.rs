//! Command handlers -- one module per subcommand

pub mod config;
pub mod render;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing::debug;

use logroute_core::config::{LogrouteConfig, MetadataConfig};
use logroute_router::EcsMetadata;

use crate::cli::{Cli, Commands, MetadataArgs};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "logroute.toml";

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `./logroute.toml` is used if
/// present, otherwise built-in defaults. Env overrides and validation apply
/// in every case.
pub async fn load_config(path: Option<&Path>) -> Result<LogrouteConfig, CliError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !tokio::fs::try_exists(&default_path).await? {
                debug!("no config file, using defaults");
                let mut config = LogrouteConfig::default();
                config.apply_env_overrides();
                config.validate()?;
                return Ok(config);
            }
            default_path
        }
    };
    Ok(LogrouteConfig::load(&path).await?)
}

/// Dispatch a parsed command line.
///
/// `loaded` is the result of [`load_config`]: `config validate` reports a
/// failure, every other command propagates it.
pub async fn execute(
    cli: Cli,
    loaded: Result<LogrouteConfig, CliError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = config_source(cli.config.as_deref());
    match cli.command {
        Commands::Render(args) => render::execute(args, &loaded?, writer).await,
        Commands::Validate(args) => validate::execute(args, &loaded?, writer).await,
        Commands::Config(args) => config::execute(args, loaded, &source, writer),
    }
}

/// Human-readable name of the config source.
pub fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_owned(),
        None => "(defaults)".to_owned(),
    }
}

/// Merge `[metadata]` with command-line overrides.
pub fn ecs_metadata(args: &MetadataArgs, config: &MetadataConfig) -> EcsMetadata {
    let pick = |flag: &Option<String>, value: &String| flag.clone().unwrap_or_else(|| value.clone());
    EcsMetadata::new(
        pick(&args.cluster, &config.cluster),
        pick(&args.task_arn, &config.task_arn),
        pick(&args.family, &config.task_definition_family),
        pick(&args.revision, &config.task_definition_revision),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_metadata_section() {
        let config = MetadataConfig {
            cluster: "file-cluster".to_owned(),
            task_arn: "arn:aws:ecs:r:1:task/c/file".to_owned(),
            task_definition_family: "shop".to_owned(),
            task_definition_revision: "1".to_owned(),
        };
        let args = MetadataArgs {
            task_arn: Some("arn:aws:ecs:r:1:task/c/flag".to_owned()),
            revision: Some("9".to_owned()),
            ..MetadataArgs::default()
        };

        let metadata = ecs_metadata(&args, &config);
        assert_eq!(metadata.cluster, "file-cluster");
        assert_eq!(metadata.task_arn, "arn:aws:ecs:r:1:task/c/flag");
        assert_eq!(metadata.task_definition(), "shop:9");
    }

    #[tokio::test]
    async fn explicit_missing_config_is_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/logroute.toml")))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logroute.toml");
        std::fs::write(&path, "[metadata]\ncluster = \"prod\"\n").unwrap();

        let config = load_config(Some(&path)).await.unwrap();
        assert_eq!(config.metadata.cluster, "prod");
    }
}
