#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`arn`]: 리소스 식별자(ARN) 파서 및 태스크 ID 추출
//! - [`options`]: 옵션 키 분류기 (목적지 번호별 그룹화, multiline 옵션)
//! - [`destination`]: 목적지 빌더 (CloudWatch Logs, Kinesis Streams, Kinesis Firehose)
//! - [`model`]: 라우팅 설정 모델 (클러스터 메타데이터 -> 컨테이너 -> 목적지)
//! - [`render`]: fluentd 설정 렌더러 및 템플릿 소스
//! - [`error`]: 도메인 에러 타입
//!
//! # 사용 예시
//! ```
//! use std::collections::HashMap;
//! use logroute_router::{EcsMetadata, FluentdTemplate, RoutingConfig};
//!
//! let mut config = RoutingConfig::new(EcsMetadata::new(
//!     "prod",
//!     "arn:aws:ecs:us-west-2:1:task/prod/abcd1234",
//!     "web",
//!     "3",
//! ));
//!
//! let options = HashMap::from([
//!     ("output0-type".to_owned(), "kinesis_streams".to_owned()),
//!     (
//!         "output0-destination-arn".to_owned(),
//!         "arn:aws:kinesis:us-west-2:1:stream/web-logs".to_owned(),
//!     ),
//! ]);
//! config.add_container("web", &options)?;
//!
//! let text = logroute_router::render_to_string(&config, &FluentdTemplate::default());
//! assert!(text.contains("stream_name web-logs"));
//! # Ok::<(), logroute_router::RouterError>(())
//! ```

pub mod arn;
pub mod destination;
pub mod error;
pub mod model;
pub mod options;
pub mod render;

// --- 주요 타입 re-export ---

// 에러
pub use error::RouterError;

// 식별자
pub use arn::{ResourceIdentifier, task_id};

// 옵션 분류
pub use options::{ClassifiedOptions, DestinationNumber, OptionGroup, classify};

// 목적지
pub use destination::{
    CloudWatchDestination, Destination, DestinationBuilder, DestinationOutput, DestinationType,
    FilterOptions, KinesisFirehoseDestination, KinesisStreamsDestination,
};

// 모델
pub use model::{Container, EcsMetadata, MultilineOptions, RoutingConfig};

// 렌더러
pub use render::{FluentdTemplate, TemplateFile, TemplateSource, render, render_to_string};
