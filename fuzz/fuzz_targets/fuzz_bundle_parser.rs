//! Fuzz target for converted policy and endpoint trees.
//!
//! The parsers may reject input but must never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_bundle_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = proxyguard_bundle::fuzz::parse_policy_json(text);
        let _ = proxyguard_bundle::fuzz::parse_endpoint_json(text);
        let _ = proxyguard_bundle::fuzz::parse_bundle_document(text);
    }
});
