//! 옵션 키 분류기
//!
//! 컨테이너의 로깅 드라이버 옵션 맵을 세 갈래로 나눕니다.
//!
//! - `output<N>-<option>` : 목적지 번호 `N`(0-9)별 옵션 그룹
//! - `multiline-start-regexp`, `multiline-end-regexp`, `multiline-separator` : 컨테이너 전역 multiline 설정
//! - 그 외 키 : 무시
//!
//! 분류 결과는 컨테이너와 분리된 임시 값([`ClassifiedOptions`])이므로,
//! 이후 단계에서 실패해도 이미 커밋된 상태는 바뀌지 않습니다.
//! 그룹 내부 옵션은 옵션 이름 순으로 정렬되어 있어 입력 맵의 순회 순서와
//! 무관하게 필터 패턴 순서가 결정됩니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::RouterError;
use crate::model::MultilineOptions;

/// 목적지 옵션 키 접두어
const OUTPUT_PREFIX: &str = "output";

/// multiline 옵션 키 접두어
const MULTILINE_PREFIX: &str = "multiline";

/// multiline 시작 정규식 옵션
pub const MULTILINE_START_REGEXP: &str = "multiline-start-regexp";

/// multiline 종료 정규식 옵션
pub const MULTILINE_END_REGEXP: &str = "multiline-end-regexp";

/// multiline 구분자 옵션
pub const MULTILINE_SEPARATOR: &str = "multiline-separator";

/// 목적지 번호 (한 자리 숫자 0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DestinationNumber(u8);

impl DestinationNumber {
    /// 숫자 문자에서 목적지 번호를 만듭니다.
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    /// 번호 값
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for DestinationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 하나의 목적지 번호에 속한 옵션 (옵션 이름 -> 값, 이름 순 정렬)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    options: BTreeMap<String, String>,
}

impl OptionGroup {
    /// 옵션 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// 옵션을 추가합니다. 같은 이름이 있으면 덮어씁니다.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.insert(name.into(), value.into());
    }

    /// 옵션 이름 순으로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 지정한 접두어로 시작하는 옵션의 값을 이름 순으로 반환합니다.
    pub fn values_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter()
            .filter(move |(name, _)| name.starts_with(prefix))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// 분류 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedOptions {
    /// 목적지 번호별 옵션 그룹 (번호 순)
    pub destinations: BTreeMap<DestinationNumber, OptionGroup>,
    /// multiline 옵션 (하나라도 지정된 경우에만 `Some`)
    pub multiline: Option<MultilineOptions>,
}

/// 옵션 맵을 분류합니다.
///
/// `output`으로 시작하지만 `output<N>-<option>` 형식이 아니거나, `multiline`으로 시작하지만
/// 알려진 세 옵션이 아니면 [`RouterError::UnrecognizedOption`]을 반환합니다.
pub fn classify<I, K, V>(options: I) -> Result<ClassifiedOptions, RouterError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut classified = ClassifiedOptions::default();

    for (key, value) in options {
        let (key, value) = (key.as_ref(), value.as_ref());

        if key.starts_with(OUTPUT_PREFIX) {
            let (number, name) = parse_destination_key(key)
                .ok_or_else(|| RouterError::UnrecognizedOption(key.to_owned()))?;
            classified
                .destinations
                .entry(number)
                .or_default()
                .insert(name, value);
        } else if key.starts_with(MULTILINE_PREFIX) {
            let multiline = classified.multiline.get_or_insert_with(Default::default);
            match key {
                MULTILINE_START_REGEXP => multiline.start_regexp = Some(value.to_owned()),
                MULTILINE_END_REGEXP => multiline.end_regexp = Some(value.to_owned()),
                MULTILINE_SEPARATOR => multiline.separator = Some(value.to_owned()),
                _ => return Err(RouterError::UnrecognizedOption(key.to_owned())),
            }
        } else {
            debug!(option = key, "ignoring log option");
        }
    }

    Ok(classified)
}

/// `output<N>-<option>` 키를 (번호, 옵션 이름)으로 분해합니다.
///
/// 옵션 이름은 `-` 뒤의 나머지 전체이며 비어 있지만 않으면 어떤 문자든 허용합니다.
/// 필터 접미어(`match.err`, `exclude:health` 등)가 서로 구분되도록 잘라내지 않습니다.
fn parse_destination_key(key: &str) -> Option<(DestinationNumber, &str)> {
    let rest = key.strip_prefix(OUTPUT_PREFIX)?;
    let mut chars = rest.chars();
    let number = DestinationNumber::from_digit(chars.next()?)?;
    let name = chars.as_str().strip_prefix('-')?;
    (!name.is_empty()).then_some((number, name))
}
