//! 라우터 에러 타입
//!
//! [`RouterError`]는 옵션 변환과 렌더링 중 발생하는 모든 에러를 표현합니다.
//! `From<RouterError> for LogrouteError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logroute_core::error::{LogrouteError, TranslateError};

/// 라우터 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// 리소스 식별자를 기대한 형태로 분해할 수 없음
    #[error("malformed resource identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// 원본 식별자
        identifier: String,
        /// 실패 사유
        reason: String,
    },

    /// 태스크 식별자의 리소스 경로가 `task`로 시작하지 않음
    #[error("malformed task identifier '{identifier}': {reason}")]
    MalformedTaskIdentifier {
        /// 원본 태스크 ARN
        identifier: String,
        /// 실패 사유
        reason: String,
    },

    /// `type` 옵션이 없거나 지원하지 않는 값
    #[error("unsupported destination type for {destination}: '{value}'")]
    UnsupportedDestinationType {
        /// 목적지 접두어 (예: `output1`)
        destination: String,
        /// 발견된 값 (없으면 빈 문자열)
        value: String,
    },

    /// `output` 또는 `multiline` 접두어를 가졌지만 알려진 형식이 아닌 옵션 키
    #[error("unrecognized log option: {0}")]
    UnrecognizedOption(String),

    /// 템플릿 로딩 실패
    #[error("template error: {reason}")]
    Template {
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RouterError {
    /// 메트릭 레이블에 사용하는 에러 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier { .. } => "malformed_identifier",
            Self::MalformedTaskIdentifier { .. } => "malformed_task_identifier",
            Self::UnsupportedDestinationType { .. } => "unsupported_destination_type",
            Self::UnrecognizedOption(_) => "unrecognized_option",
            Self::Template { .. } => "template",
            Self::Io(_) => "io",
        }
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<RouterError> for LogrouteError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::Io(e) => LogrouteError::Io(e),
            RouterError::Template { reason } => {
                LogrouteError::Translate(TranslateError::Template(reason))
            }
            other => LogrouteError::Translate(TranslateError::Rejected(other.to_string())),
        }
    }
}
