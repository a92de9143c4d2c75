//! Task file: the containers of one task and their logging-driver options.
//!
//! ```toml
//! [[containers]]
//! name = "web"
//!
//! [containers.options]
//! output0-type = "cloudwatch_logs"
//! output0-destination-arn = "arn:aws:logs:us-west-2:111122223333:log-group:web:*"
//! ```
//!
//! The same structure is accepted as JSON when the file ends in `.json`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use logroute_core::error::TranslateError;
use logroute_router::{EcsMetadata, RoutingConfig};

use crate::error::CliError;

/// One container entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// Container name, used as the fluentd tag.
    pub name: String,
    /// Logging-driver options as given to the container.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Parsed task file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskFile {
    #[serde(default)]
    pub containers: Vec<ContainerEntry>,
}

impl TaskFile {
    /// Read a task file, choosing the parser by extension (`.json`, otherwise TOML).
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CliError::TaskFile(format!("not found: {}", path.display()))
            } else {
                CliError::Io(e)
            }
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let task = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| match e {
            CliError::TaskFile(reason) => {
                CliError::TaskFile(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })?;

        debug!(
            path = %path.display(),
            containers = task.containers.len(),
            "task file loaded"
        );
        Ok(task)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::TaskFile(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self, CliError> {
        serde_json::from_str(content).map_err(|e| CliError::TaskFile(e.to_string()))
    }

    /// Translate every container into a routing config.
    ///
    /// Stops at the first rejected container. Container names must be unique
    /// within the task since they become fluentd tags and label names.
    pub fn build(&self, metadata: EcsMetadata) -> Result<RoutingConfig, CliError> {
        let mut seen = HashSet::new();
        for container in &self.containers {
            if container.name.is_empty() {
                return Err(CliError::TaskFile("container name must not be empty".to_owned()));
            }
            if !seen.insert(container.name.as_str()) {
                return Err(CliError::TaskFile(format!(
                    "duplicate container name: {}",
                    container.name
                )));
            }
        }

        let mut config = RoutingConfig::new(metadata);
        for container in &self.containers {
            config
                .add_container(&container.name, &container.options)
                .map_err(|e| {
                    TranslateError::Rejected(format!("container '{}': {}", container.name, e))
                })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK_ARN: &str = "arn:aws:ecs:us-west-2:1:task/prod/abcd1234";

    fn metadata() -> EcsMetadata {
        EcsMetadata::new("prod", TASK_ARN, "shop", "3")
    }

    #[test]
    fn parses_toml_task() {
        let task = TaskFile::from_toml_str(
            r#"
[[containers]]
name = "web"

[containers.options]
output0-type = "kinesis_streams"
output0-destination-arn = "arn:aws:kinesis:us-west-2:1:stream/web"

[[containers]]
name = "sidecar"
"#,
        )
        .unwrap();

        assert_eq!(task.containers.len(), 2);
        assert_eq!(task.containers[0].options.len(), 2);
        assert!(task.containers[1].options.is_empty());
    }

    #[test]
    fn parses_json_task() {
        let task = TaskFile::from_json_str(
            r#"{"containers":[{"name":"api","options":{"multiline-separator":"\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(task.containers[0].name, "api");
        assert_eq!(
            task.containers[0].options.get("multiline-separator").map(String::as_str),
            Some("\n")
        );
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        let err = TaskFile::from_toml_str("tasks = []").unwrap_err();
        assert!(matches!(err, CliError::TaskFile(_)));
    }

    #[test]
    fn build_translates_all_containers() {
        let task = TaskFile::from_toml_str(
            r#"
[[containers]]
name = "web"
options = { output0-type = "cloudwatch_logs", output0-destination-arn = "arn:aws:logs:us-west-2:1:log-group:g:*" }

[[containers]]
name = "api"
options = { output3-type = "kinesis_firehose", output3-destination-arn = "arn:aws:firehose:us-west-2:1:deliverystream/d" }
"#,
        )
        .unwrap();

        let config = task.build(metadata()).unwrap();
        assert_eq!(config.containers().len(), 2);
        let uids: Vec<&str> = config.destinations().map(|d| d.uid.as_str()).collect();
        assert_eq!(uids, vec!["DEST_WEB_0", "DEST_API_3"]);
    }

    #[test]
    fn build_reports_rejected_container() {
        let task = TaskFile::from_json_str(
            r#"{"containers":[{"name":"web","options":{"output1-type":"bogus_type"}}]}"#,
        )
        .unwrap();
        let err = task.build(metadata()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        let message = err.to_string();
        assert!(message.contains("container 'web'"), "got: {message}");
        assert!(message.contains("bogus_type"), "got: {message}");
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let task = TaskFile::from_json_str(
            r#"{"containers":[{"name":"web"},{"name":"web"}]}"#,
        )
        .unwrap();
        let err = task.build(metadata()).unwrap_err();
        assert!(err.to_string().contains("duplicate container name: web"));
    }

    #[tokio::test]
    async fn load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");
        std::fs::write(&path, r#"{"containers":[{"name":"web"}]}"#).unwrap();

        let task = TaskFile::load(&path).await.unwrap();
        assert_eq!(task.containers[0].name, "web");
    }

    #[tokio::test]
    async fn load_missing_file_is_task_file_error() {
        let err = TaskFile::load(Path::new("/nonexistent/task.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::TaskFile(ref m) if m.contains("not found")));
    }
}
