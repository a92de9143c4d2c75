#![no_main]

use libfuzzer_sys::fuzz_target;
use logroute_router::{ResourceIdentifier, task_id};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(arn) = ResourceIdentifier::parse(input) {
            // 파싱 결과를 다시 문자열로 만들면 원래 입력과 같아야 한다
            assert_eq!(arn.to_string(), input);
            let _ = arn.resource_segments('/');
            let _ = arn.resource_segments(':');
        }
        let _ = task_id(input);
    }
});
