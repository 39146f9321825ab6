//! Fuzz target for evaluation of arbitrary single-document bundles.
//!
//! Whatever parses must evaluate without panicking, and the summary must agree with the
//! emitted results.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_bundle_evaluation
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn baseline() -> &'static proxyguard_domain::rules::RuleSet {
    static RULES: OnceLock<proxyguard_domain::rules::RuleSet> = OnceLock::new();
    RULES.get_or_init(|| {
        let doc = proxyguard_settings::preset("baseline").expect("baseline preset");
        proxyguard_settings::rules_from_document(&doc).expect("baseline converts")
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(model) = proxyguard_bundle::parse_bundle_document(text) else {
        return;
    };

    let report = proxyguard_domain::evaluate(Some(&model), baseline());
    let results: u32 = report.endpoints.iter().map(|e| e.results.len() as u32).sum();
    assert_eq!(report.summary.total, results);
    assert_eq!(report.summary.passed + report.summary.failed, results);
});
