//! Fuzz target for rule documents and config files.
//!
//! Malformed rules must come back as errors, never panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_documents
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(doc) = proxyguard_settings::parse_rules_json(text) {
        let _ = proxyguard_settings::rules_from_document(&doc);
    }
    if let Ok(doc) = proxyguard_settings::parse_rules_toml(text) {
        let _ = proxyguard_settings::rules_from_document(&doc);
    }
    if let Ok(cfg) = proxyguard_settings::parse_config_toml(text) {
        let _ = proxyguard_settings::resolve_config(cfg, Default::default());
    }
});
