//! fluentd 설정 렌더러
//!
//! [`RoutingConfig`]를 순회하며 주입된 [`FluentdTemplate`]의 조각을 이어 붙입니다.
//!
//! # 출력 구조
//! ```text
//! <source> (unix 소켓 입력)
//! <filter **> (클러스터/태스크 메타데이터)
//! 컨테이너마다: [<filter TAG> concat]  <match TAG> copy -> relabel @UID ...
//! 목적지마다:   <label @UID> grep 필터 + 출력 1개 </label>
//! ```
//!
//! 같은 모델과 템플릿은 항상 같은 텍스트를 만듭니다. 렌더링 자체는 실패하지 않으며,
//! [`render`]는 출력 싱크의 I/O 에러만 돌려줍니다.

pub mod template;

pub use template::{FluentdTemplate, TemplateFile, TemplateSource};

use std::io::Write;

use metrics::counter;
use tracing::debug;

use logroute_core::metrics::ROUTER_RENDERS_TOTAL;

use crate::destination::{Destination, DestinationOutput};
use crate::model::{Container, RoutingConfig};
use template::substitute;

/// 라우팅 설정을 렌더링하여 `out`에 한 번에 씁니다.
pub fn render<W: Write>(
    config: &RoutingConfig,
    template: &FluentdTemplate,
    mut out: W,
) -> std::io::Result<()> {
    let text = render_to_string(config, template);
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// 라우팅 설정을 문자열로 렌더링합니다.
pub fn render_to_string(config: &RoutingConfig, template: &FluentdTemplate) -> String {
    let mut out = String::new();
    let metadata = config.metadata();
    let task_definition = metadata.task_definition();

    substitute(
        &mut out,
        &template.source,
        &[("socket_path", template.socket_path.as_str())],
    );
    substitute(
        &mut out,
        &template.metadata_filter,
        &[
            ("cluster", metadata.cluster.as_str()),
            ("task_arn", metadata.task_arn.as_str()),
            ("task_definition", task_definition.as_str()),
        ],
    );

    for container in config.containers() {
        render_container(&mut out, container, template);
    }

    for destination in config.destinations() {
        render_destination(&mut out, destination, template);
    }

    counter!(ROUTER_RENDERS_TOTAL).increment(1);
    debug!(
        containers = config.containers().len(),
        destinations = config.destination_count(),
        bytes = out.len(),
        "routing config rendered"
    );
    out
}

/// multiline 필터와 fan-out 블록
fn render_container(out: &mut String, container: &Container, template: &FluentdTemplate) {
    let tag = container.tag.as_str();

    if let Some(multiline) = &container.multiline {
        substitute(out, &template.multiline_open, &[("tag", tag)]);
        let lines = [
            (&multiline.start_regexp, &template.multiline_start_regexp),
            (&multiline.end_regexp, &template.multiline_end_regexp),
            (&multiline.separator, &template.multiline_separator),
        ];
        for (value, fragment) in lines {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                substitute(out, fragment, &[("value", value)]);
            }
        }
        substitute(out, &template.multiline_close, &[("tag", tag)]);
    }

    substitute(out, &template.copy_open, &[("tag", tag)]);
    for destination in &container.destinations {
        substitute(
            out,
            &template.copy_store,
            &[("tag", tag), ("uid", destination.uid.as_str())],
        );
    }
    substitute(out, &template.copy_close, &[("tag", tag)]);
}

/// 목적지 라벨 블록 (grep 필터 + 출력)
fn render_destination(out: &mut String, destination: &Destination, template: &FluentdTemplate) {
    let tag = destination.tag.as_str();
    let uid = destination.uid.as_str();

    substitute(out, &template.label_open, &[("tag", tag), ("uid", uid)]);
    for pattern in &destination.filter.match_patterns {
        substitute(out, &template.match_pattern, &[("pattern", pattern.as_str())]);
    }
    for pattern in &destination.filter.exclude_patterns {
        substitute(out, &template.exclude_pattern, &[("pattern", pattern.as_str())]);
    }
    substitute(out, &template.grep_close, &[("tag", tag), ("uid", uid)]);

    match &destination.output {
        DestinationOutput::CloudWatch(cw) => substitute(
            out,
            &template.cloudwatch_output,
            &[
                ("tag", tag),
                ("uid", uid),
                ("region", cw.region.as_str()),
                ("log_group", cw.log_group.as_str()),
                ("log_stream", cw.log_stream.as_str()),
            ],
        ),
        DestinationOutput::KinesisStreams(ks) => substitute(
            out,
            &template.kinesis_streams_output,
            &[
                ("tag", tag),
                ("uid", uid),
                ("region", ks.region.as_str()),
                ("stream_name", ks.stream_name.as_str()),
            ],
        ),
        DestinationOutput::KinesisFirehose(kf) => substitute(
            out,
            &template.kinesis_firehose_output,
            &[
                ("tag", tag),
                ("uid", uid),
                ("region", kf.region.as_str()),
                ("delivery_stream_name", kf.delivery_stream_name.as_str()),
            ],
        ),
    }

    substitute(out, &template.label_close, &[("tag", tag), ("uid", uid)]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EcsMetadata;

    const TASK_ARN: &str = "arn:aws:ecs:us-west-2:1:task/prod/abcd1234";

    fn config() -> RoutingConfig {
        RoutingConfig::new(EcsMetadata::new("prod", TASK_ARN, "web", "3"))
    }

    #[test]
    fn empty_config_renders_source_and_metadata() {
        let text = render_to_string(&config(), &FluentdTemplate::default());
        assert!(text.starts_with("<source>\n  @type unix\n  path /socket/fluentd.sock\n"));
        assert!(text.contains("    ecs_cluster prod\n"));
        assert!(text.contains(&format!("    ecs_task_arn {TASK_ARN}\n")));
        assert!(text.contains("    ecs_task_definition web:3\n"));
        assert!(!text.contains("<label"));
    }

    #[test]
    fn cloudwatch_destination_block() {
        let mut config = config();
        config
            .add_container(
                "web",
                [
                    ("output0-type", "cloudwatch_logs"),
                    (
                        "output0-destination-arn",
                        "arn:aws:logs:us-west-2:1:log-group:myapp:prefix-*",
                    ),
                    ("output0-match-1", "ERROR"),
                    ("output0-exclude-1", "DEBUG"),
                ],
            )
            .unwrap();

        let text = render_to_string(&config, &FluentdTemplate::default());
        let expected = "\
<label @DEST_WEB_0>
  <filter web>
    @type grep
    <regexp>
      key log
      pattern ERROR
    </regexp>
    <exclude>
      key log
      pattern DEBUG
    </exclude>
  </filter>

  <match web>
    @type cloudwatch_logs
    @id DEST_WEB_0_OUTPUT
    region us-west-2
    log_group_name myapp
    log_stream_name prefix-/web/abcd1234
    auto_create_stream true
  </match>
</label>
";
        assert!(text.contains(expected), "rendered:\n{text}");
    }

    #[test]
    fn fan_out_lists_every_destination() {
        let mut config = config();
        config
            .add_container(
                "api",
                [
                    ("output0-type", "kinesis_streams"),
                    ("output0-destination-arn", "arn:aws:kinesis:us-east-1:1:stream/a"),
                    ("output1-type", "kinesis_firehose"),
                    (
                        "output1-destination-arn",
                        "arn:aws:firehose:us-east-1:1:deliverystream/b",
                    ),
                ],
            )
            .unwrap();

        let text = render_to_string(&config, &FluentdTemplate::default());
        let expected = "\
<match api>
  @type copy
  <store>
    @type relabel
    @label @DEST_API_0
  </store>
  <store>
    @type relabel
    @label @DEST_API_1
  </store>
</match>
";
        assert!(text.contains(expected), "rendered:\n{text}");
        assert!(text.contains("    @type kinesis_streams\n    @id DEST_API_0_OUTPUT\n"));
        assert!(text.contains("    stream_name a\n"));
        assert!(text.contains("    @type kinesis_firehose\n    @id DEST_API_1_OUTPUT\n"));
        assert!(text.contains("    delivery_stream_name b\n"));
    }

    #[test]
    fn multiline_block_emits_only_set_fields() {
        let mut config = config();
        config
            .add_container(
                "app",
                [
                    ("multiline-start-regexp", "/^\\d{4}/"),
                    ("multiline-separator", ""),
                ],
            )
            .unwrap();

        let text = render_to_string(&config, &FluentdTemplate::default());
        let expected = "\
<filter app>
  @type concat
  key log
  multiline_start_regexp /^\\d{4}/
</filter>
";
        assert!(text.contains(expected), "rendered:\n{text}");
        assert!(!text.contains("multiline_end_regexp"));
        assert!(!text.contains("separator"));
    }

    #[test]
    fn container_without_multiline_has_no_concat_filter() {
        let mut config = config();
        config.add_container("plain", Vec::<(String, String)>::new()).unwrap();
        let text = render_to_string(&config, &FluentdTemplate::default());
        assert!(!text.contains("@type concat"));
        assert!(text.contains("<match plain>\n  @type copy\n</match>\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut config = config();
        let options: std::collections::HashMap<String, String> = (0..5)
            .map(|i| (format!("output0-match-{i}"), format!("pattern-{i}")))
            .chain([
                ("output0-type".to_owned(), "kinesis_streams".to_owned()),
                (
                    "output0-destination-arn".to_owned(),
                    "arn:aws:kinesis:r:1:stream/s".to_owned(),
                ),
            ])
            .collect();
        config.add_container("web", &options).unwrap();

        let template = FluentdTemplate::default();
        let first = render_to_string(&config, &template);
        let second = render_to_string(&config, &template);
        assert_eq!(first, second);

        let positions: Vec<usize> = (0..5)
            .map(|i| first.find(&format!("pattern pattern-{i}\n")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn render_writes_to_sink() {
        let mut buf = Vec::new();
        render(&config(), &FluentdTemplate::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, render_to_string(&config(), &FluentdTemplate::default()));
    }

    #[test]
    fn custom_template_fragments_are_used() {
        let mut config = config();
        config
            .add_container(
                "web",
                [
                    ("output0-type", "kinesis_streams"),
                    ("output0-destination-arn", "arn:aws:kinesis:r:1:stream/s"),
                ],
            )
            .unwrap();
        let template = FluentdTemplate {
            kinesis_streams_output: "  # {{uid}} -> {{stream_name}} in {{region}}\n".to_owned(),
            ..FluentdTemplate::default()
        }
        .with_socket_path("/run/fluent.sock");

        let text = render_to_string(&config, &template);
        assert!(text.contains("  # DEST_WEB_0 -> s in r\n"));
        assert!(text.contains("path /run/fluent.sock\n"));
    }
}
