//! 메트릭 상수
//!
//! 모든 메트릭의 이름과 레이블 키를 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 익스포터 설치는 바이너리의 몫이며, 설치되지 않은 경우 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logroute_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logroute_core::metrics::ROUTER_CONTAINERS_ADDED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 목적지 유형 레이블 키 (cloudwatch_logs, kinesis_firehose, kinesis_streams)
pub const LABEL_DESTINATION_TYPE: &str = "destination_type";

/// 에러 종류 레이블 키
pub const LABEL_ERROR_KIND: &str = "error_kind";

// ─── Router 메트릭 ─────────────────────────────────────────────────

/// Router: 추가된 컨테이너 수 (counter)
pub const ROUTER_CONTAINERS_ADDED_TOTAL: &str = "logroute_router_containers_added_total";

/// Router: 거부된 컨테이너 수 (counter, label: error_kind)
pub const ROUTER_CONTAINERS_REJECTED_TOTAL: &str = "logroute_router_containers_rejected_total";

/// Router: 생성된 목적지 수 (counter, label: destination_type)
pub const ROUTER_DESTINATIONS_BUILT_TOTAL: &str = "logroute_router_destinations_built_total";

/// Router: 렌더링 횟수 (counter)
pub const ROUTER_RENDERS_TOTAL: &str = "logroute_router_renders_total";
