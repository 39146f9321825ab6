//! CLI entry point for proxyguard.
//!
//! Argument parsing, file I/O and exit codes only. Evaluation lives in `proxyguard-app`.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use proxyguard_app::{
    CheckInput, RulesInput, parse_report_json, render_html, render_markdown, render_table,
    run_check, run_rules, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
use proxyguard_types::{ProxyguardReport, Verdict};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_REPORT: &str = "artifacts/proxyguard/report.json";

#[derive(Parser, Debug)]
#[command(
    name = "proxyguard",
    version,
    about = "Flow and policy placement checks for API-gateway proxy bundles"
)]
struct Cli {
    /// Bundle directory (or `apiproxy/` parent), or a single-document bundle JSON file.
    #[arg(long, global = true, default_value = ".")]
    bundle: Utf8PathBuf,

    /// Path to proxyguard config TOML. Relative paths resolve against the bundle directory.
    #[arg(long, global = true, default_value = "proxyguard.toml")]
    config: Utf8PathBuf,

    /// Rule file (JSON, or TOML by extension). Overrides `rules_file` from the config.
    #[arg(long, global = true)]
    rules: Option<Utf8PathBuf>,

    /// Built-in rule set used when no rules are configured (baseline|none).
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the bundle and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = DEFAULT_REPORT)]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/proxyguard/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Write an HTML report alongside the JSON.
        #[arg(long)]
        write_html: bool,

        /// Where to write the HTML report (if enabled).
        #[arg(long, default_value = "artifacts/proxyguard/report.html")]
        html_out: Utf8PathBuf,

        /// Do not print the result tables to stdout.
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the resolved rule set as JSON.
    Rules,

    /// Render Markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = DEFAULT_REPORT)]
        report: Utf8PathBuf,

        /// Where to write the output (prints to stdout if not given).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render a standalone HTML page from an existing JSON report.
    Html {
        /// Path to the JSON report file.
        #[arg(long, default_value = DEFAULT_REPORT)]
        report: Utf8PathBuf,

        /// Where to write the output (prints to stdout if not given).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Print result tables from an existing JSON report.
    Table {
        /// Path to the JSON report file.
        #[arg(long, default_value = DEFAULT_REPORT)]
        report: Utf8PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.cmd {
        Commands::Check {
            report_out,
            write_markdown,
            markdown_out,
            write_html,
            html_out,
            quiet,
        } => cmd_check(
            &cli,
            CheckArtifacts {
                report_out,
                markdown_out: write_markdown.then_some(markdown_out.as_path()),
                html_out: write_html.then_some(html_out.as_path()),
                quiet: *quiet,
            },
        ),
        Commands::Rules => cmd_rules(&cli),
        Commands::Md { report, output } => {
            let report = read_report(report)?;
            emit(&render_markdown(&to_renderable(&report)), output.as_deref())
        }
        Commands::Html { report, output } => {
            let report = read_report(report)?;
            emit(&render_html(&to_renderable(&report)), output.as_deref())
        }
        Commands::Table { report } => {
            let report = read_report(report)?;
            print!("{}", render_table(&to_renderable(&report)));
            Ok(())
        }
    }
}

/// Logs go to stderr; stdout carries rendered output only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PROXYGUARD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

struct CheckArtifacts<'a> {
    report_out: &'a Utf8Path,
    markdown_out: Option<&'a Utf8Path>,
    html_out: Option<&'a Utf8Path>,
    quiet: bool,
}

fn cmd_check(cli: &Cli, artifacts: CheckArtifacts<'_>) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        if !cli.bundle.exists() {
            anyhow::bail!("bundle path does not exist: {}", cli.bundle);
        }
        let config = ConfigFile::load(cli);

        let input = CheckInput {
            bundle: &cli.bundle,
            rules: config.rules_input(cli),
        };
        let output = run_check(input)?;
        let report = &output.report;

        write_report_file(artifacts.report_out, report).context("write report json")?;

        let renderable = to_renderable(report);
        if let Some(path) = artifacts.markdown_out {
            write_text_file(path, &render_markdown(&renderable)).context("write markdown")?;
        }
        if let Some(path) = artifacts.html_out {
            write_text_file(path, &render_html(&renderable)).context("write html")?;
        }
        if !artifacts.quiet {
            print!("{}", render_table(&renderable));
        }

        eprintln!(
            "proxyguard: {} ({} of {} checks passed); report written to {}",
            verdict_label(report.verdict),
            report.summary.passed,
            report.summary.total,
            artifacts.report_out
        );

        Ok(verdict_exit_code(report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(cli.bundle.as_str(), &format!("{err:#}"));
            let _ = write_report_file(artifacts.report_out, &report);
            eprintln!("proxyguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_rules(cli: &Cli) -> anyhow::Result<()> {
    let config = ConfigFile::load(cli);
    let json = run_rules(&config.rules_input(cli))?;
    println!("{json}");
    Ok(())
}

/// Config file contents plus the directory its relative paths resolve against.
struct ConfigFile {
    text: String,
    dir: Utf8PathBuf,
}

impl ConfigFile {
    /// A missing config file is allowed; defaults apply.
    fn load(cli: &Cli) -> Self {
        let path = if cli.config.is_absolute() {
            cli.config.clone()
        } else {
            bundle_dir(&cli.bundle).join(&cli.config)
        };
        let text = std::fs::read_to_string(&path).unwrap_or_default();
        debug!(config = %path, found = !text.is_empty(), "config file");
        let dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Self { text, dir }
    }

    fn rules_input<'a>(&'a self, cli: &'a Cli) -> RulesInput<'a> {
        RulesInput {
            config_text: &self.text,
            config_dir: &self.dir,
            rules_path: cli.rules.as_deref(),
            preset: cli.preset.clone(),
        }
    }
}

/// Directory holding the bundle: the path itself, or the parent of a bundle file.
fn bundle_dir(bundle: &Utf8Path) -> Utf8PathBuf {
    if bundle.is_file() {
        match bundle.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        }
    } else {
        bundle.to_path_buf()
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
    }
}

fn read_report(path: &Utf8Path) -> anyhow::Result<ProxyguardReport> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn emit(text: &str, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => write_text_file(path, text).context("write output"),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ProxyguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}
