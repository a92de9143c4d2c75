//! 통합 테스트 -- 옵션 맵에서 fluentd 설정 텍스트까지 전체 흐름 검증

use std::collections::{BTreeMap, HashMap};

use logroute_router::{
    DestinationOutput, EcsMetadata, FluentdTemplate, KinesisStreamsDestination, RouterError,
    RoutingConfig, TemplateFile, TemplateSource, render, render_to_string,
};

const TASK_ARN: &str = "arn:aws:ecs:us-west-2:111122223333:task/prod/abcd1234";

fn routing_config() -> RoutingConfig {
    RoutingConfig::new(EcsMetadata::new("prod", TASK_ARN, "shop", "42"))
}

fn options(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// 여러 컨테이너, 여러 목적지 유형을 한 번에 렌더링
#[test]
fn multi_container_task_renders_every_block() {
    let mut config = routing_config();

    config
        .add_container(
            "web",
            &options(&[
                ("output0-type", "cloudwatch_logs"),
                (
                    "output0-destination-arn",
                    "arn:aws:logs:us-west-2:111122223333:log-group:shop-web:nginx-*",
                ),
                ("output0-exclude-health", "GET /healthz"),
                ("output1-type", "kinesis_firehose"),
                (
                    "output1-destination-arn",
                    "arn:aws:firehose:us-west-2:111122223333:deliverystream/shop-archive",
                ),
                ("mode", "non-blocking"),
            ]),
        )
        .expect("web options should translate");

    config
        .add_container(
            "worker",
            &options(&[
                ("multiline-start-regexp", "/^\\[\\d{4}-/"),
                ("output0-type", "kinesis_streams"),
                (
                    "output0-destination-arn",
                    "arn:aws:kinesis:us-west-2:111122223333:stream/shop-events",
                ),
                ("output0-match-error", "ERROR"),
            ]),
        )
        .expect("worker options should translate");

    assert_eq!(config.containers().len(), 2);
    assert_eq!(config.destination_count(), 3);

    let text = render_to_string(&config, &FluentdTemplate::default());

    assert_eq!(text.matches("<label @").count(), 3);
    assert!(text.contains("<label @DEST_WEB_0>"));
    assert!(text.contains("<label @DEST_WEB_1>"));
    assert!(text.contains("<label @DEST_WORKER_0>"));
    assert!(text.contains("    log_stream_name nginx-/web/abcd1234\n"));
    assert!(text.contains("    delivery_stream_name shop-archive\n"));
    assert!(text.contains("    stream_name shop-events\n"));
    assert!(text.contains("<filter worker>\n  @type concat\n"));
    assert!(!text.contains("<filter web>\n  @type concat\n"));
    assert!(text.contains("    ecs_task_definition shop:42\n"));

    // 메타데이터 필터는 컨테이너 블록보다, 컨테이너 블록은 라벨 블록보다 앞선다
    let metadata_at = text.find("@type record_transformer").unwrap();
    let copy_at = text.find("@type copy").unwrap();
    let label_at = text.find("<label @").unwrap();
    assert!(metadata_at < copy_at && copy_at < label_at);
}

#[test]
fn kinesis_streams_round_trip() {
    let mut config = routing_config();
    let container = config
        .add_container(
            "api",
            [
                ("output0-type", "kinesis_streams"),
                (
                    "output0-destination-arn",
                    "arn:aws:kinesis:us-east-1:123:stream/my-stream",
                ),
            ],
        )
        .unwrap();

    assert_eq!(
        container.destinations[0].output,
        DestinationOutput::KinesisStreams(KinesisStreamsDestination {
            region: "us-east-1".to_owned(),
            stream_name: "my-stream".to_owned(),
        })
    );
}

#[test]
fn bogus_type_appends_nothing() {
    let mut config = routing_config();
    let err = config
        .add_container("web", [("output1-type", "bogus_type")])
        .unwrap_err();
    assert!(matches!(err, RouterError::UnsupportedDestinationType { .. }));
    assert!(config.containers().is_empty());
    assert_eq!(config.destination_count(), 0);
}

#[test]
fn unrelated_prefix_is_ignored() {
    let mut config = routing_config();
    let container = config
        .add_container("web", [("badprefix-foo", "bar")])
        .unwrap();
    assert!(container.destinations.is_empty());
    assert!(container.multiline.is_none());
}

#[test]
fn legacy_task_arn_yields_same_task_id() {
    let mut config = RoutingConfig::new(EcsMetadata::new(
        "prod",
        "arn:aws:ecs:us-west-2:1:task/abcd1234",
        "shop",
        "1",
    ));
    let container = config
        .add_container(
            "web",
            [
                ("output0-type", "cloudwatch_logs"),
                ("output0-destination-arn", "arn:aws:logs:us-west-2:1:log-group:g:*"),
            ],
        )
        .unwrap();
    match &container.destinations[0].output {
        DestinationOutput::CloudWatch(cw) => assert_eq!(cw.log_stream, "web/abcd1234"),
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn input_map_type_does_not_change_output() {
    let entries = [
        ("output0-type", "kinesis_streams"),
        ("output0-destination-arn", "arn:aws:kinesis:r:1:stream/s"),
        ("output0-match-b", "beta"),
        ("output0-match-a", "alpha"),
        ("output0-match-c", "gamma"),
    ];

    let mut from_hash = routing_config();
    from_hash.add_container("web", &options(&entries)).unwrap();

    let btree: BTreeMap<&str, &str> = entries.iter().copied().collect();
    let mut from_btree = routing_config();
    from_btree.add_container("web", &btree).unwrap();

    let mut reversed = entries;
    reversed.reverse();
    let mut from_vec = routing_config();
    from_vec.add_container("web", reversed).unwrap();

    let template = FluentdTemplate::default();
    let expected = render_to_string(&from_hash, &template);
    assert_eq!(render_to_string(&from_btree, &template), expected);
    assert_eq!(render_to_string(&from_vec, &template), expected);

    let alpha = expected.find("pattern alpha").unwrap();
    let beta = expected.find("pattern beta").unwrap();
    let gamma = expected.find("pattern gamma").unwrap();
    assert!(alpha < beta && beta < gamma);
}

#[test]
fn template_file_source_drives_render() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("fluentd-template.toml");
    std::fs::write(
        &path,
        r#"
socket_path = "/var/run/fluent/fluent.sock"
cloudwatch_output = """
  <match {{tag}}>
    @type cloudwatch_logs
    region {{region}}
    log_group_name {{log_group}}
    log_stream_name {{log_stream}}
    auto_create_stream false
  </match>
"""
"#,
    )
    .expect("should write template");

    let template = TemplateFile::new(&path).load().expect("should load template");

    let mut config = routing_config();
    config
        .add_container(
            "web",
            [
                ("output0-type", "cloudwatch_logs"),
                ("output0-destination-arn", "arn:aws:logs:us-west-2:1:log-group:g:s"),
            ],
        )
        .unwrap();

    let mut out = Vec::new();
    render(&config, &template, &mut out).expect("render to vec");
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("path /var/run/fluent/fluent.sock\n"));
    assert!(text.contains("    auto_create_stream false\n"));
    assert!(!text.contains("auto_create_stream true"));
}
