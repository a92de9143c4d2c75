#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logroute_router::{EcsMetadata, FluentdTemplate, RoutingConfig, render_to_string};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    task_arn: String,
    container: String,
    /// 옵션 목록 (최대 16개로 제한)
    options: Vec<FuzzOption>,
}

#[derive(Arbitrary, Debug)]
struct FuzzOption {
    key: FuzzKey,
    value: String,
}

/// 분류기 분기를 고르게 거치도록 키 형태를 나눈다
#[derive(Arbitrary, Debug)]
enum FuzzKey {
    Destination { number: u8, name: String },
    Type { number: u8 },
    DestinationArn { number: u8 },
    Multiline(String),
    Raw(String),
}

impl FuzzKey {
    fn to_key(&self) -> String {
        match self {
            FuzzKey::Destination { number, name } => format!("output{}-{}", number % 10, name),
            FuzzKey::Type { number } => format!("output{}-type", number % 10),
            FuzzKey::DestinationArn { number } => {
                format!("output{}-destination-arn", number % 10)
            }
            FuzzKey::Multiline(suffix) => format!("multiline-{suffix}"),
            FuzzKey::Raw(key) => key.clone(),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let options: Vec<(String, String)> = input
        .options
        .iter()
        .take(16)
        .map(|o| (o.key.to_key(), o.value.clone()))
        .collect();

    let mut config = RoutingConfig::new(EcsMetadata::new("fuzz", input.task_arn, "fuzz", "1"));
    let before = config.clone();

    let added = config
        .add_container(&input.container, options)
        .map(|c| c.destinations.iter().map(|d| d.uid.clone()).collect::<Vec<_>>());

    match added {
        Ok(mut uids) => {
            // 목적지 번호는 유일하므로 UID도 유일하다
            let count = uids.len();
            uids.sort_unstable();
            uids.dedup();
            assert_eq!(uids.len(), count);
        }
        Err(_) => assert_eq!(config, before),
    }

    let _ = render_to_string(&config, &FluentdTemplate::default());
});
