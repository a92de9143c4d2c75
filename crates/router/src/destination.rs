//! 목적지 빌더
//!
//! 목적지 번호별 옵션 그룹([`OptionGroup`])을 하나의 [`Destination`]으로 조립합니다.
//!
//! 1. `type` 옵션으로 목적지 유형을 결정
//! 2. `destination-arn`을 파싱하여 유형별 페이로드 생성
//! 3. `match*` / `exclude*` 옵션으로 필터 패턴 수집
//!
//! 페이로드는 [`DestinationOutput`] 열거형이므로 목적지는 항상 정확히 하나의 출력만 가집니다.

use std::fmt;

use serde::Serialize;

use crate::arn::{self, ResourceIdentifier};
use crate::error::RouterError;
use crate::options::{DestinationNumber, OptionGroup};

/// 목적지 유형 옵션 이름
pub const TYPE_OPTION: &str = "type";

/// 목적지 ARN 옵션 이름
pub const DESTINATION_ARN_OPTION: &str = "destination-arn";

/// 포함 필터 옵션 접두어
pub const MATCH_PREFIX: &str = "match";

/// 제외 필터 옵션 접두어
pub const EXCLUDE_PREFIX: &str = "exclude";

/// CloudWatch Logs 리소스 유형
const LOG_GROUP_RESOURCE_TYPE: &str = "log-group";

/// 목적지 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    /// CloudWatch Logs
    CloudwatchLogs,
    /// Kinesis Data Firehose
    KinesisFirehose,
    /// Kinesis Data Streams
    KinesisStreams,
}

impl DestinationType {
    /// 옵션 값에서 목적지 유형을 파싱합니다.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cloudwatch_logs" => Some(Self::CloudwatchLogs),
            "kinesis_firehose" => Some(Self::KinesisFirehose),
            "kinesis_streams" => Some(Self::KinesisStreams),
            _ => None,
        }
    }

    /// 옵션 값 표현
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CloudwatchLogs => "cloudwatch_logs",
            Self::KinesisFirehose => "kinesis_firehose",
            Self::KinesisStreams => "kinesis_streams",
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CloudWatch Logs 목적지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudWatchDestination {
    pub region: String,
    pub log_group: String,
    pub log_stream: String,
}

/// Kinesis Data Streams 목적지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KinesisStreamsDestination {
    pub region: String,
    pub stream_name: String,
}

/// Kinesis Data Firehose 목적지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KinesisFirehoseDestination {
    pub region: String,
    pub delivery_stream_name: String,
}

/// 목적지 출력 -- 세 유형 중 정확히 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DestinationOutput {
    #[serde(rename = "cloudwatch_logs")]
    CloudWatch(CloudWatchDestination),
    #[serde(rename = "kinesis_streams")]
    KinesisStreams(KinesisStreamsDestination),
    #[serde(rename = "kinesis_firehose")]
    KinesisFirehose(KinesisFirehoseDestination),
}

impl DestinationOutput {
    /// 출력의 목적지 유형
    pub fn destination_type(&self) -> DestinationType {
        match self {
            Self::CloudWatch(_) => DestinationType::CloudwatchLogs,
            Self::KinesisStreams(_) => DestinationType::KinesisStreams,
            Self::KinesisFirehose(_) => DestinationType::KinesisFirehose,
        }
    }

    /// 출력 리전
    pub fn region(&self) -> &str {
        match self {
            Self::CloudWatch(cw) => &cw.region,
            Self::KinesisStreams(ks) => &ks.region,
            Self::KinesisFirehose(kf) => &kf.region,
        }
    }

    /// 사람이 읽을 수 있는 대상 이름 (로그 그룹/스트림, 스트림 이름 등)
    pub fn target(&self) -> String {
        match self {
            Self::CloudWatch(cw) => format!("{}:{}", cw.log_group, cw.log_stream),
            Self::KinesisStreams(ks) => ks.stream_name.clone(),
            Self::KinesisFirehose(kf) => kf.delivery_stream_name.clone(),
        }
    }
}

/// 필터 옵션 (포함/제외 패턴, 옵션 이름 순)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub match_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl FilterOptions {
    /// 옵션 그룹에서 `match*` / `exclude*` 옵션을 수집합니다.
    pub fn from_group(group: &OptionGroup) -> Self {
        Self {
            match_patterns: group
                .values_with_prefix(MATCH_PREFIX)
                .map(str::to_owned)
                .collect(),
            exclude_patterns: group
                .values_with_prefix(EXCLUDE_PREFIX)
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// 하나의 로그 전송 목적지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    /// 컨테이너 태그 (렌더링 시 부모 범위 없이 사용)
    pub tag: String,
    /// 라우팅 설정 전체에서 유일한 라벨 (`DEST_<TAG>_<N>`)
    pub uid: String,
    /// 필터 옵션
    pub filter: FilterOptions,
    /// 출력
    pub output: DestinationOutput,
}

impl Destination {
    /// 태그와 목적지 번호로 UID를 만듭니다.
    pub fn uid_for(tag: &str, number: DestinationNumber) -> String {
        format!("DEST_{}_{}", tag.to_uppercase(), number)
    }
}

/// 컨테이너 하나의 목적지들을 조립하는 빌더
///
/// 태스크 ID는 CloudWatch 목적지가 처음 필요로 할 때 한 번만 계산합니다.
pub struct DestinationBuilder<'a> {
    /// 컨테이너 이름 (태그)
    container_name: &'a str,
    /// 태스크 ARN
    task_arn: &'a str,
    /// 계산된 태스크 ID 캐시
    task_id: Option<String>,
}

impl<'a> DestinationBuilder<'a> {
    /// 새 빌더를 생성합니다.
    pub fn new(container_name: &'a str, task_arn: &'a str) -> Self {
        Self {
            container_name,
            task_arn,
            task_id: None,
        }
    }

    /// 옵션 그룹 하나를 목적지로 조립합니다.
    pub fn build(
        &mut self,
        number: DestinationNumber,
        group: &OptionGroup,
    ) -> Result<Destination, RouterError> {
        let type_value = group.get(TYPE_OPTION).unwrap_or_default();
        let destination_type = DestinationType::parse(type_value).ok_or_else(|| {
            RouterError::UnsupportedDestinationType {
                destination: format!("output{number}"),
                value: type_value.to_owned(),
            }
        })?;

        let destination_arn = group.get(DESTINATION_ARN_OPTION).unwrap_or_default();
        let output = match destination_type {
            DestinationType::CloudwatchLogs => {
                let task_id = self.task_id()?.to_owned();
                DestinationOutput::CloudWatch(parse_cloudwatch_destination(
                    destination_arn,
                    self.container_name,
                    &task_id,
                )?)
            }
            DestinationType::KinesisStreams => {
                let (region, stream_name) = parse_kinesis_resource(destination_arn)?;
                DestinationOutput::KinesisStreams(KinesisStreamsDestination {
                    region,
                    stream_name,
                })
            }
            DestinationType::KinesisFirehose => {
                let (region, delivery_stream_name) = parse_kinesis_resource(destination_arn)?;
                DestinationOutput::KinesisFirehose(KinesisFirehoseDestination {
                    region,
                    delivery_stream_name,
                })
            }
        };

        Ok(Destination {
            tag: self.container_name.to_owned(),
            uid: Destination::uid_for(self.container_name, number),
            filter: FilterOptions::from_group(group),
            output,
        })
    }

    fn task_id(&mut self) -> Result<&str, RouterError> {
        if self.task_id.is_none() {
            self.task_id = Some(arn::task_id(self.task_arn)?);
        }
        Ok(self.task_id.as_deref().unwrap_or_default())
    }
}

/// CloudWatch Logs ARN을 파싱합니다.
fn parse_cloudwatch_destination(
    destination_arn: &str,
    container_name: &str,
    task_id: &str,
) -> Result<CloudWatchDestination, RouterError> {
    let arn = ResourceIdentifier::parse(destination_arn)?;
    let segments = arn.resource_segments(':');

    let [resource_type, log_group, log_stream, ..] = segments.as_slice() else {
        return Err(RouterError::malformed(
            destination_arn,
            "expected log-group:<group>:<stream>",
        ));
    };
    if *resource_type != LOG_GROUP_RESOURCE_TYPE {
        return Err(RouterError::malformed(
            destination_arn,
            format!("unexpected resource type '{resource_type}'"),
        ));
    }

    Ok(CloudWatchDestination {
        region: arn.region.clone(),
        log_group: (*log_group).to_owned(),
        log_stream: expand_log_stream(log_stream, container_name, task_id),
    })
}

/// 로그 스트림 와일드카드를 확장합니다.
///
/// `prefix*` -> `prefix/<container>/<task-id>`. 첫 번째 `*` 하나만 치환하며,
/// 결과가 `/`로 시작하면 선행 `/` 하나를 제거합니다.
pub fn expand_log_stream(log_stream: &str, container_name: &str, task_id: &str) -> String {
    if !log_stream.ends_with('*') {
        return log_stream.to_owned();
    }

    let expanded = log_stream.replacen('*', &format!("/{container_name}/{task_id}"), 1);
    match expanded.strip_prefix('/') {
        Some(stripped) => stripped.to_owned(),
        None => expanded,
    }
}

/// Kinesis Streams / Firehose ARN에서 (리전, 스트림 이름)을 추출합니다.
///
/// 리소스는 `/`로 나눠 최소 두 세그먼트여야 하며 이름은 두 번째 세그먼트입니다.
fn parse_kinesis_resource(destination_arn: &str) -> Result<(String, String), RouterError> {
    let arn = ResourceIdentifier::parse(destination_arn)?;
    let segments = arn.resource_segments('/');
    let Some(name) = segments.get(1) else {
        return Err(RouterError::malformed(
            destination_arn,
            "expected <resource-type>/<name>",
        ));
    };
    Ok((arn.region.clone(), (*name).to_owned()))
}
