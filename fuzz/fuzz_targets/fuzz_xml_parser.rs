#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use jtl::{SampleSource, XmlParser};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail with an error, never panic
    if let Ok(parser) = XmlParser::new(Cursor::new(data)) {
        for sample in parser.http_samples().take(1000) {
            if sample.is_err() {
                break;
            }
        }
    }
});
