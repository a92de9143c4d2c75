//! fluentd 설정 템플릿
//!
//! [`FluentdTemplate`]은 출력 블록별 텍스트 조각 모음입니다. 각 조각은 `{{name}}` 형식의
//! 자리표시자를 가지며, 렌더러가 모델 값으로 치환합니다.
//! 알 수 없는 자리표시자는 그대로 남습니다.
//!
//! 템플릿은 렌더러에 주입됩니다. 내장 기본값을 쓰거나, TOML 문자열/리더/파일에서
//! 일부 조각만 덮어쓸 수 있습니다 (지정하지 않은 조각은 기본값 유지).
//!
//! # 오버라이드 예시
//! ```toml
//! socket_path = "/var/run/fluent.sock"
//! cloudwatch_output = """
//!   <match {{tag}}>
//!     @type cloudwatch_logs
//!     region {{region}}
//!     log_group_name {{log_group}}
//!     log_stream_name {{log_stream}}
//!     auto_create_stream false
//!   </match>
//! """
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use logroute_core::config::DEFAULT_SOCKET_PATH;

use crate::error::RouterError;

/// 블록별 템플릿 조각
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FluentdTemplate {
    /// fluentd 입력 unix 소켓 경로 (`{{socket_path}}`)
    pub socket_path: String,
    /// 입력 블록. 변수: `socket_path`
    pub source: String,
    /// 메타데이터 필터. 변수: `cluster`, `task_arn`, `task_definition`
    pub metadata_filter: String,
    /// multiline 필터 시작. 변수: `tag`
    pub multiline_open: String,
    /// multiline 시작 정규식 줄. 변수: `value`
    pub multiline_start_regexp: String,
    /// multiline 종료 정규식 줄. 변수: `value`
    pub multiline_end_regexp: String,
    /// multiline 구분자 줄. 변수: `value`
    pub multiline_separator: String,
    pub multiline_close: String,
    /// 컨테이너 fan-out 시작. 변수: `tag`
    pub copy_open: String,
    /// fan-out 대상 하나. 변수: `tag`, `uid`
    pub copy_store: String,
    pub copy_close: String,
    /// 목적지 라벨 및 grep 필터 시작. 변수: `tag`, `uid`
    pub label_open: String,
    /// 포함 규칙 하나. 변수: `pattern`
    pub match_pattern: String,
    /// 제외 규칙 하나. 변수: `pattern`
    pub exclude_pattern: String,
    pub grep_close: String,
    /// 변수: `tag`, `uid`, `region`, `log_group`, `log_stream`
    pub cloudwatch_output: String,
    /// 변수: `tag`, `uid`, `region`, `stream_name`
    pub kinesis_streams_output: String,
    /// 변수: `tag`, `uid`, `region`, `delivery_stream_name`
    pub kinesis_firehose_output: String,
    pub label_close: String,
}

impl Default for FluentdTemplate {
    fn default() -> Self {
        Self {
            socket_path: DEFAULT_SOCKET_PATH.to_owned(),
            source: "\
<source>
  @type unix
  path {{socket_path}}
  @id docker_input
</source>

"
            .to_owned(),
            metadata_filter: "\
<filter **>
  @type record_transformer
  <record>
    ecs_cluster {{cluster}}
    ecs_task_arn {{task_arn}}
    ecs_task_definition {{task_definition}}
  </record>
</filter>

"
            .to_owned(),
            multiline_open: "\
<filter {{tag}}>
  @type concat
  key log
"
            .to_owned(),
            multiline_start_regexp: "  multiline_start_regexp {{value}}\n".to_owned(),
            multiline_end_regexp: "  multiline_end_regexp {{value}}\n".to_owned(),
            multiline_separator: "  separator {{value}}\n".to_owned(),
            multiline_close: "</filter>\n\n".to_owned(),
            copy_open: "\
<match {{tag}}>
  @type copy
"
            .to_owned(),
            copy_store: "\
  <store>
    @type relabel
    @label @{{uid}}
  </store>
"
            .to_owned(),
            copy_close: "</match>\n\n".to_owned(),
            label_open: "\
<label @{{uid}}>
  <filter {{tag}}>
    @type grep
"
            .to_owned(),
            match_pattern: "\
    <regexp>
      key log
      pattern {{pattern}}
    </regexp>
"
            .to_owned(),
            exclude_pattern: "\
    <exclude>
      key log
      pattern {{pattern}}
    </exclude>
"
            .to_owned(),
            grep_close: "  </filter>\n\n".to_owned(),
            cloudwatch_output: "\
  <match {{tag}}>
    @type cloudwatch_logs
    @id {{uid}}_OUTPUT
    region {{region}}
    log_group_name {{log_group}}
    log_stream_name {{log_stream}}
    auto_create_stream true
  </match>
"
            .to_owned(),
            kinesis_streams_output: "\
  <match {{tag}}>
    @type kinesis_streams
    @id {{uid}}_OUTPUT
    region {{region}}
    stream_name {{stream_name}}
  </match>
"
            .to_owned(),
            kinesis_firehose_output: "\
  <match {{tag}}>
    @type kinesis_firehose
    @id {{uid}}_OUTPUT
    region {{region}}
    delivery_stream_name {{delivery_stream_name}}
  </match>
"
            .to_owned(),
            label_close: "</label>\n\n".to_owned(),
        }
    }
}

impl FluentdTemplate {
    /// TOML 문자열에서 템플릿 오버라이드를 읽습니다.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RouterError> {
        toml::from_str(toml_str).map_err(|e| RouterError::Template {
            reason: e.to_string(),
        })
    }

    /// 리더에서 템플릿 오버라이드를 읽습니다.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, RouterError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_toml_str(&content)
    }

    /// 입력 소켓 경로를 바꿉니다.
    pub fn with_socket_path(mut self, socket_path: impl Into<String>) -> Self {
        self.socket_path = socket_path.into();
        self
    }
}

/// 템플릿 공급원
///
/// 렌더러는 고정된 파일 경로 대신 이 trait을 통해 템플릿을 받습니다.
pub trait TemplateSource {
    /// 템플릿을 읽어옵니다.
    fn load(&self) -> Result<FluentdTemplate, RouterError>;
}

impl TemplateSource for FluentdTemplate {
    fn load(&self) -> Result<FluentdTemplate, RouterError> {
        Ok(self.clone())
    }
}

/// 파일 기반 템플릿 공급원 (호출 시점에 읽음)
#[derive(Debug, Clone)]
pub struct TemplateFile {
    path: PathBuf,
    socket_path: Option<String>,
}

/// 파일이 `socket_path`를 직접 지정했는지 확인하기 위한 부분 뷰
#[derive(Deserialize)]
struct SocketPathOverride {
    socket_path: Option<String>,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            socket_path: None,
        }
    }

    /// 파일이 `socket_path`를 지정하지 않았을 때 쓸 소켓 경로를 설정합니다.
    pub fn with_socket_path(mut self, socket_path: impl Into<String>) -> Self {
        self.socket_path = Some(socket_path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for TemplateFile {
    fn load(&self) -> Result<FluentdTemplate, RouterError> {
        debug!(path = %self.path.display(), "loading template file");
        let content = std::fs::read_to_string(&self.path).map_err(|e| RouterError::Template {
            reason: format!("{}: {}", self.path.display(), e),
        })?;
        let with_path = |e: RouterError| RouterError::Template {
            reason: format!("{}: {}", self.path.display(), e),
        };

        let mut template = FluentdTemplate::from_toml_str(&content).map_err(with_path)?;
        if let Some(fallback) = &self.socket_path {
            let file_socket = toml::from_str::<SocketPathOverride>(&content)
                .map_err(|e| with_path(RouterError::Template { reason: e.to_string() }))?;
            if file_socket.socket_path.is_none() {
                template.socket_path = fallback.clone();
            }
        }
        Ok(template)
    }
}

/// 조각의 `{{name}}` 자리표시자를 치환하여 `out`에 덧붙입니다.
pub(crate) fn substitute(out: &mut String, fragment: &str, vars: &[(&str, &str)]) {
    let mut rest = fragment;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            // 닫히지 않은 자리표시자는 그대로 출력
            out.push_str(&rest[start..]);
            return;
        };

        let name = after_open[..end].trim();
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    out.push_str(rest);
}
