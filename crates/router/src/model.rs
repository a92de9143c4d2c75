//! 라우팅 설정 모델
//!
//! 변환의 결과물인 트리 구조입니다.
//!
//! ```text
//! RoutingConfig
//!  ├─ EcsMetadata (cluster, task ARN, family, revision)
//!  └─ Container*  (tag, multiline?)
//!      └─ Destination* (uid, filter, output)
//! ```
//!
//! 한 번 만들고 컨테이너를 추가(append)만 하며, 삭제나 수정 API는 없습니다.
//! 같은 인스턴스에 대한 동시 `add_container` 호출은 호출자가 직렬화해야 합니다.

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, warn};

use logroute_core::metrics::{
    LABEL_DESTINATION_TYPE, LABEL_ERROR_KIND, ROUTER_CONTAINERS_ADDED_TOTAL,
    ROUTER_CONTAINERS_REJECTED_TOTAL, ROUTER_DESTINATIONS_BUILT_TOTAL,
};

use crate::destination::{Destination, DestinationBuilder};
use crate::error::RouterError;
use crate::options::classify;

/// ECS 태스크 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EcsMetadata {
    pub cluster: String,
    pub task_arn: String,
    pub task_definition_family: String,
    pub task_definition_revision: String,
}

impl EcsMetadata {
    pub fn new(
        cluster: impl Into<String>,
        task_arn: impl Into<String>,
        task_definition_family: impl Into<String>,
        task_definition_revision: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            task_arn: task_arn.into(),
            task_definition_family: task_definition_family.into(),
            task_definition_revision: task_definition_revision.into(),
        }
    }

    /// `family:revision` 형식의 태스크 정의 이름
    pub fn task_definition(&self) -> String {
        format!(
            "{}:{}",
            self.task_definition_family, self.task_definition_revision
        )
    }
}

/// multiline 레코드 재조립 옵션
///
/// 각 필드는 독립적으로 선택 사항입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultilineOptions {
    /// 새 레코드 시작을 나타내는 정규식
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_regexp: Option<String>,
    /// 레코드 끝을 나타내는 정규식
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_regexp: Option<String>,
    /// 이어 붙일 때 사용할 구분자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

/// 로그를 보내는 컨테이너 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    /// fluentd 내부 라우팅 태그 (보통 컨테이너 이름)
    pub tag: String,
    /// multiline 옵션
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<MultilineOptions>,
    /// 목적지 목록 (목적지 번호 순)
    pub destinations: Vec<Destination>,
}

/// 라우팅 설정 (변환 결과 루트)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutingConfig {
    metadata: EcsMetadata,
    containers: Vec<Container>,
}

impl RoutingConfig {
    /// 클러스터 메타데이터로 빈 라우팅 설정을 만듭니다.
    pub fn new(metadata: EcsMetadata) -> Self {
        Self {
            metadata,
            containers: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &EcsMetadata {
        &self.metadata
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// 모든 컨테이너의 목적지를 순서대로 순회합니다.
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.containers.iter().flat_map(|c| c.destinations.iter())
    }

    pub fn destination_count(&self) -> usize {
        self.containers.iter().map(|c| c.destinations.len()).sum()
    }

    /// 컨테이너 하나의 로깅 옵션을 변환하여 추가합니다.
    ///
    /// 옵션 분류와 모든 목적지 조립이 성공한 경우에만 컨테이너가 추가됩니다.
    /// 에러가 발생하면 설정은 호출 전과 동일하게 유지됩니다.
    /// 태그 중복 여부는 검사하지 않습니다 (호출자 책임).
    pub fn add_container<I, K, V>(
        &mut self,
        name: &str,
        options: I,
    ) -> Result<&Container, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match build_container(name, &self.metadata.task_arn, options) {
            Ok(container) => {
                counter!(ROUTER_CONTAINERS_ADDED_TOTAL).increment(1);
                info!(
                    container = name,
                    destinations = container.destinations.len(),
                    multiline = container.multiline.is_some(),
                    "container added to routing config"
                );
                for destination in &container.destinations {
                    counter!(
                        ROUTER_DESTINATIONS_BUILT_TOTAL,
                        LABEL_DESTINATION_TYPE => destination.output.destination_type().as_str()
                    )
                    .increment(1);
                }
                self.containers.push(container);
                self.containers.last().ok_or_else(|| {
                    RouterError::Io(std::io::Error::other("committed container missing"))
                })
            }
            Err(e) => {
                counter!(ROUTER_CONTAINERS_REJECTED_TOTAL, LABEL_ERROR_KIND => e.kind())
                    .increment(1);
                warn!(container = name, error = %e, "container rejected");
                Err(e)
            }
        }
    }
}

/// 임시 값에 모든 것을 조립한 뒤 완성된 컨테이너를 반환합니다.
fn build_container<I, K, V>(
    name: &str,
    task_arn: &str,
    options: I,
) -> Result<Container, RouterError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let classified = classify(options)?;
    let mut builder = DestinationBuilder::new(name, task_arn);

    let mut destinations = Vec::with_capacity(classified.destinations.len());
    for (number, group) in &classified.destinations {
        let destination = builder.build(*number, group)?;
        debug!(
            container = name,
            uid = destination.uid.as_str(),
            destination_type = %destination.output.destination_type(),
            "destination built"
        );
        destinations.push(destination);
    }

    Ok(Container {
        tag: name.to_owned(),
        multiline: classified.multiline,
        destinations,
    })
}
