//! 에러 타입: 도메인별 에러 정의

/// logroute 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogrouteError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 옵션 변환 에러
    #[error("translate error: {0}")]
    Translate(#[from] TranslateError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 옵션 변환 에러
///
/// 라우터 크레이트의 상세 에러를 상위 레이어로 올릴 때 사용합니다.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// 로그 옵션 거부 (식별자 오류, 미지원 목적지 유형 등)
    #[error("log options rejected: {0}")]
    Rejected(String),

    /// 템플릿 로딩 실패
    #[error("template error: {0}")]
    Template(String),
}
