//! 설정 관리: logroute.toml 파싱 및 런타임 설정
//!
//! [`LogrouteConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGROUTE_METADATA_CLUSTER=prod` 형식)
//! 3. 설정 파일 (`logroute.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logroute_core::error::LogrouteError> {
//! use logroute_core::config::LogrouteConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogrouteConfig::load("logroute.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogrouteConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LogrouteError};

/// fluentd unix 소켓 기본 경로
pub const DEFAULT_SOCKET_PATH: &str = "/socket/fluentd.sock";

/// logroute 통합 설정
///
/// `logroute.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogrouteConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// ECS 태스크 메타데이터
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// 렌더링 설정
    #[serde(default)]
    pub render: RenderConfig,
}

impl LogrouteConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogrouteError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogrouteError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogrouteError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogrouteError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogrouteError> {
        toml::from_str(toml_str).map_err(|e| {
            LogrouteError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGROUTE_{SECTION}_{FIELD}`
    /// 예: `LOGROUTE_METADATA_TASK_ARN=arn:aws:ecs:...`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGROUTE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGROUTE_GENERAL_LOG_FORMAT");

        // Metadata
        override_string(&mut self.metadata.cluster, "LOGROUTE_METADATA_CLUSTER");
        override_string(&mut self.metadata.task_arn, "LOGROUTE_METADATA_TASK_ARN");
        override_string(
            &mut self.metadata.task_definition_family,
            "LOGROUTE_METADATA_TASK_DEFINITION_FAMILY",
        );
        override_string(
            &mut self.metadata.task_definition_revision,
            "LOGROUTE_METADATA_TASK_DEFINITION_REVISION",
        );

        // Render
        override_string(
            &mut self.render.template_path,
            "LOGROUTE_RENDER_TEMPLATE_PATH",
        );
        override_string(&mut self.render.output_path, "LOGROUTE_RENDER_OUTPUT_PATH");
        override_string(&mut self.render.socket_path, "LOGROUTE_RENDER_SOCKET_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogrouteError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // task_arn은 비어 있을 수 있음 (CLI 인자로 나중에 채워짐)
        if !self.metadata.task_arn.is_empty() && !self.metadata.task_arn.starts_with("arn:") {
            return Err(ConfigError::InvalidValue {
                field: "metadata.task_arn".to_owned(),
                reason: "must start with 'arn:'".to_owned(),
            }
            .into());
        }

        if self.render.socket_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "render.socket_path".to_owned(),
                reason: "socket path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// ECS 태스크 메타데이터
///
/// 렌더링된 설정의 메타데이터 필터가 모든 레코드에 찍는 값입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// 클러스터 이름
    pub cluster: String,
    /// 태스크 ARN
    pub task_arn: String,
    /// 태스크 정의 패밀리
    pub task_definition_family: String,
    /// 태스크 정의 리비전
    pub task_definition_revision: String,
}

/// 렌더링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 템플릿 오버라이드 파일 경로 (비어 있으면 내장 템플릿)
    pub template_path: String,
    /// 출력 파일 경로 (비어 있으면 stdout)
    pub output_path: String,
    /// fluentd 입력 unix 소켓 경로
    pub socket_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_path: String::new(),
            output_path: String::new(),
            socket_path: DEFAULT_SOCKET_PATH.to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}
