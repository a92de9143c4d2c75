//! 리소스 식별자(ARN) 파서
//!
//! `arn:partition:service:region:account-id:resource` 형식의 식별자를 분해합니다.
//! 리소스 부분은 다섯 번째 `:` 이후 전체이며, 그 자체로 `:`나 `/`를 포함할 수 있습니다.
//! 리소스를 어떻게 나눌지는 호출자(목적지 유형별 빌더)가 결정합니다.
//!
//! # 사용 예시
//! ```
//! use logroute_router::arn::ResourceIdentifier;
//!
//! let arn = ResourceIdentifier::parse("arn:aws:kinesis:us-east-1:123:stream/my-stream")?;
//! assert_eq!(arn.region, "us-east-1");
//! assert_eq!(arn.resource_segments('/'), vec!["stream", "my-stream"]);
//! # Ok::<(), logroute_router::RouterError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RouterError;

/// ARN 접두어
const ARN_PREFIX: &str = "arn:";

/// 태스크 ARN의 리소스 유형
const TASK_RESOURCE_TYPE: &str = "task";

/// 분해된 리소스 식별자
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    /// 파티션 (aws, aws-cn, aws-us-gov 등)
    pub partition: String,
    /// 서비스 네임스페이스 (logs, kinesis, firehose, ecs 등)
    pub service: String,
    /// 리전 (비어 있을 수 있음)
    pub region: String,
    /// 계정 ID (비어 있을 수 있음)
    pub account_id: String,
    /// 리소스 문자열 (호출자가 추가로 분할)
    pub resource: String,
}

impl ResourceIdentifier {
    /// 식별자 문자열을 파싱합니다.
    ///
    /// `arn:` 접두어가 없거나 섹션이 여섯 개 미만이면
    /// [`RouterError::MalformedIdentifier`]를 반환합니다.
    pub fn parse(identifier: &str) -> Result<Self, RouterError> {
        let rest = identifier
            .strip_prefix(ARN_PREFIX)
            .ok_or_else(|| RouterError::malformed(identifier, "missing 'arn:' prefix"))?;

        let mut sections = rest.splitn(5, ':');
        let (Some(partition), Some(service), Some(region), Some(account_id), Some(resource)) = (
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
        ) else {
            return Err(RouterError::malformed(identifier, "not enough sections"));
        };

        Ok(Self {
            partition: partition.to_owned(),
            service: service.to_owned(),
            region: region.to_owned(),
            account_id: account_id.to_owned(),
            resource: resource.to_owned(),
        })
    }

    /// 리소스 문자열을 구분자로 나눕니다.
    pub fn resource_segments(&self, separator: char) -> Vec<&str> {
        self.resource.split(separator).collect()
    }
}

impl FromStr for ResourceIdentifier {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// 태스크 ARN에서 태스크 ID를 추출합니다.
///
/// 리소스 경로의 첫 세그먼트는 `task`여야 하며, 태스크 ID는 항상 마지막 세그먼트입니다.
/// 구형(`task/<id>`)과 신형(`task/<cluster>/<id>`) 형식을 모두 지원합니다.
pub fn task_id(task_arn: &str) -> Result<String, RouterError> {
    let arn = ResourceIdentifier::parse(task_arn).map_err(|e| {
        RouterError::MalformedTaskIdentifier {
            identifier: task_arn.to_owned(),
            reason: e.to_string(),
        }
    })?;

    let segments = arn.resource_segments('/');
    if segments.first() != Some(&TASK_RESOURCE_TYPE) {
        return Err(RouterError::MalformedTaskIdentifier {
            identifier: task_arn.to_owned(),
            reason: format!(
                "unexpected resource type '{}'",
                segments.first().copied().unwrap_or_default()
            ),
        });
    }

    // split은 최소 한 개의 세그먼트를 돌려주므로 last()는 항상 존재
    Ok(segments.last().copied().unwrap_or_default().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinesis_arn() {
        let arn = ResourceIdentifier::parse("arn:aws:kinesis:us-east-1:123:stream/my-stream")
            .unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "kinesis");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account_id, "123");
        assert_eq!(arn.resource, "stream/my-stream");
    }

    #[test]
    fn resource_keeps_embedded_colons() {
        let arn =
            ResourceIdentifier::parse("arn:aws:logs:us-west-2:1:log-group:myapp:prefix-*").unwrap();
        assert_eq!(arn.resource, "log-group:myapp:prefix-*");
        assert_eq!(
            arn.resource_segments(':'),
            vec!["log-group", "myapp", "prefix-*"]
        );
    }

    #[test]
    fn empty_region_and_account_are_allowed() {
        let arn = ResourceIdentifier::parse("arn:aws:s3:::bucket").unwrap();
        assert!(arn.region.is_empty());
        assert!(arn.account_id.is_empty());
        assert_eq!(arn.resource, "bucket");
    }

    #[test]
    fn missing_prefix_is_malformed() {
        let err = ResourceIdentifier::parse("aws:kinesis:us-east-1:123:stream/x").unwrap_err();
        assert!(matches!(err, RouterError::MalformedIdentifier { .. }));
    }

    #[test]
    fn too_few_sections_is_malformed() {
        let err = ResourceIdentifier::parse("arn:aws:kinesis:us-east-1:123").unwrap_err();
        assert!(matches!(err, RouterError::MalformedIdentifier { .. }));
    }

    #[test]
    fn empty_string_is_malformed() {
        assert!(ResourceIdentifier::parse("").is_err());
    }

    #[test]
    fn display_roundtrips_source_text() {
        let text = "arn:aws-cn:firehose:cn-north-1:42:deliverystream/logs";
        let arn: ResourceIdentifier = text.parse().unwrap();
        assert_eq!(arn.to_string(), text);
    }

    #[test]
    fn task_id_from_short_form() {
        let id = task_id("arn:aws:ecs:us-west-2:1:task/abcd1234").unwrap();
        assert_eq!(id, "abcd1234");
    }

    #[test]
    fn task_id_from_long_form() {
        let id = task_id("arn:aws:ecs:us-west-2:1:task/cluster/abcd1234").unwrap();
        assert_eq!(id, "abcd1234");
    }

    #[test]
    fn task_id_rejects_other_resource_type() {
        let err = task_id("arn:aws:ecs:us-west-2:1:service/cluster/web").unwrap_err();
        match err {
            RouterError::MalformedTaskIdentifier { reason, .. } => {
                assert!(reason.contains("service"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn task_id_rejects_unparseable_arn() {
        let err = task_id("not-an-arn").unwrap_err();
        assert!(matches!(err, RouterError::MalformedTaskIdentifier { .. }));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_arbitrary_input_does_not_panic(input in ".{0,200}") {
                let _ = ResourceIdentifier::parse(&input);
                let _ = task_id(&input);
            }

            #[test]
            fn task_id_is_last_segment(
                region in "[a-z]{2}-[a-z]{4,7}-[1-9]",
                cluster in "[a-zA-Z0-9_-]{1,32}",
                id in "[a-f0-9]{8,32}",
            ) {
                let short = format!("arn:aws:ecs:{region}:123456789012:task/{id}");
                let long = format!("arn:aws:ecs:{region}:123456789012:task/{cluster}/{id}");
                prop_assert_eq!(task_id(&short).unwrap(), id.clone());
                prop_assert_eq!(task_id(&long).unwrap(), id);
            }
        }
    }
}
