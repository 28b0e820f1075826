//! Fuzz target for config parsing and resolution.
//!
//! Any TOML or JSON document must either resolve or be rejected with an
//! error; resolution never panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfverdict_config::{
    ConfigFormat, parse_config, resolve_metadata_config, resolve_report_config,
    resolve_testrun_config,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for format in [ConfigFormat::Toml, ConfigFormat::Json] {
        if let Ok(file) = parse_config(text, format) {
            let _ = resolve_report_config(&file);
            let _ = resolve_testrun_config(&file);
            let _ = resolve_metadata_config(&file);
        }
    }
});
