//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use proxyguard_app::{CheckInput, RulesInput, parse_report_json, run_check, serialize_report};
use proxyguard_test_util::normalize_nondeterministic;
use proxyguard_types::{Summary, Verdict};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Project root: the parent of the xtask directory.
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask has no parent directory")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "proxyguard.report.v1.json",
            generate: || schema_for!(proxyguard_types::ProxyguardReport),
        },
        SchemaSpec {
            filename: "proxyguard.config.v1.json",
            generate: || schema_for!(proxyguard_settings::ProxyguardConfigV1),
        },
        SchemaSpec {
            filename: "proxyguard.rules.v1.json",
            generate: || schema_for!(proxyguard_settings::RuleDocument),
        },
    ]
}

/// Pretty-printed JSON with a trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail if any file in schemas/ differs from what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Run every bundle under tests/fixtures/ twice and check report invariants:
/// summary and verdict agree with the results, the JSON parses back, and the two runs
/// are identical once timestamps are normalized.
fn conform() -> anyhow::Result<()> {
    let dir = fixtures_dir()?;
    let mut fixtures = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            let path = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| anyhow!("non-UTF-8 fixture path: {}", p.display()))?;
            fixtures.push(path);
        }
    }
    fixtures.sort();

    let mut errors = Vec::new();
    for fixture in &fixtures {
        let name = fixture.file_name().unwrap_or(fixture.as_str());
        match conform_fixture(fixture) {
            Ok(summary) => println!(
                "ok    {name} ({} checks, {} failed)",
                summary.total, summary.failed
            ),
            Err(err) => {
                println!("FAIL  {name}");
                errors.push(format!("{name}: {err:#}"));
            }
        }
    }

    if errors.is_empty() {
        println!("\n{} fixtures conform.", fixtures.len());
        return Ok(());
    }
    for err in &errors {
        eprintln!("  - {err}");
    }
    bail!("{} of {} fixtures failed conformance", errors.len(), fixtures.len())
}

fn conform_fixture(dir: &Utf8Path) -> anyhow::Result<Summary> {
    let single = dir.join("bundle.json");
    let bundle = if single.is_file() { single } else { dir.to_path_buf() };
    let config_text = fs::read_to_string(dir.join("proxyguard.toml")).unwrap_or_default();

    let run = || -> anyhow::Result<(Summary, serde_json::Value)> {
        let output = run_check(CheckInput {
            bundle: &bundle,
            rules: RulesInput {
                config_text: &config_text,
                config_dir: dir,
                rules_path: None,
                preset: None,
            },
        })?;
        let report = output.report;

        let scanned = Summary::from_endpoints(&report.endpoints);
        if report.summary != scanned {
            bail!("summary {:?} does not match results {scanned:?}", report.summary);
        }
        if report.verdict != Verdict::from_summary(&scanned) {
            bail!("verdict {:?} does not match summary", report.verdict);
        }

        let text = String::from_utf8(serialize_report(&report)?).context("report is not UTF-8")?;
        let parsed = parse_report_json(&text).context("report does not parse back")?;
        if parsed.endpoints != report.endpoints {
            bail!("endpoints changed across a JSON round trip");
        }
        Ok((report.summary, serde_json::from_str(&text)?))
    };

    let (summary, first) = run()?;
    let (_, second) = run()?;
    if normalize_nondeterministic(first) != normalize_nondeterministic(second) {
        bail!("repeated runs produced different reports");
    }
    Ok(summary)
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Check report invariants for every tests/fixtures bundle");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
