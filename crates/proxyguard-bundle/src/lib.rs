//! Bundle adapters: discover converted trees and parse them into a [`BundleModel`].
//!
//! This crate is allowed to do filesystem IO. It does not convert XML; it reads the JSON
//! trees a converter produced.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use proxyguard_domain::model::{BundleModel, Endpoint, PolicyDefinition};
use proxyguard_types::EndpointKind;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub use discover::{POLICIES_DIR, PROXIES_DIR, TARGETS_DIR, bundle_root, discover_tree_files};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a converted policy file (or flattened record).
    pub fn parse_policy_json(text: &str) -> anyhow::Result<()> {
        let value: Value = serde_json::from_str(text)?;
        let _ = parse::parse_policy(&value, "fuzz")?;
        Ok(())
    }

    /// Parse arbitrary text as a converted endpoint file.
    pub fn parse_endpoint_json(text: &str) -> anyhow::Result<()> {
        let value: Value = serde_json::from_str(text)?;
        let _ = parse::parse_endpoint(&value, EndpointKind::ProxyEndpoint, "fuzz")?;
        Ok(())
    }

    /// Parse arbitrary text as a single-document bundle.
    pub fn parse_bundle_document(text: &str) -> anyhow::Result<()> {
        let _ = super::parse_bundle_document(text)?;
        Ok(())
    }
}

/// Build the in-memory bundle model used by the engine.
///
/// `path` is either a bundle directory (see [`bundle_root`]) or a single JSON document.
pub fn build_bundle_model(path: &Utf8Path) -> anyhow::Result<BundleModel> {
    let model = if path.is_file() {
        let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        parse_bundle_document(&text).with_context(|| format!("parse bundle document {path}"))?
    } else if path.is_dir() {
        load_directory(&bundle_root(path))?
    } else {
        anyhow::bail!("bundle path does not exist: {path}");
    };

    log_policy_issues(&model.policies);
    info!(
        bundle = %path,
        policies = model.policies.len(),
        proxies = model.endpoints(EndpointKind::ProxyEndpoint).len(),
        targets = model.endpoints(EndpointKind::TargetEndpoint).len(),
        "bundle loaded"
    );
    Ok(model)
}

/// Parse a single-document bundle: `{ "policies": [...], "proxies": [...], "targets": [...] }`.
///
/// Missing `proxies`/`targets` stay `None`; a missing `policies` is an empty catalog.
pub fn parse_bundle_document(text: &str) -> anyhow::Result<BundleModel> {
    let doc: Value = serde_json::from_str(text).context("parse JSON")?;
    let doc = doc.as_object().context("bundle document must be a JSON object")?;

    let policies = match doc.get(POLICIES_DIR) {
        None => Vec::new(),
        Some(list) => as_list(list, POLICIES_DIR)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                parse::parse_policy(v, &format!("policy-{i}"))
                    .with_context(|| format!("{POLICIES_DIR}[{i}]"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
    };

    let endpoints = |key: &str, kind: EndpointKind| -> anyhow::Result<Option<Vec<Endpoint>>> {
        let Some(list) = doc.get(key) else {
            return Ok(None);
        };
        as_list(list, key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                parse::parse_endpoint(v, kind, &parse::fallback_name(None))
                    .with_context(|| format!("{key}[{i}]"))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Some)
    };

    Ok(BundleModel {
        policies,
        proxies: endpoints(PROXIES_DIR, EndpointKind::ProxyEndpoint)?,
        targets: endpoints(TARGETS_DIR, EndpointKind::TargetEndpoint)?,
    })
}

fn as_list<'a>(value: &'a Value, key: &str) -> anyhow::Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .with_context(|| format!("`{key}` must be an array"))
}

fn load_directory(root: &Utf8Path) -> anyhow::Result<BundleModel> {
    let policies = match discover_tree_files(root, POLICIES_DIR).context("discover policies")? {
        Some(files) => parse_files(&files, |value, stem| parse::parse_policy(value, stem))?,
        None => Vec::new(),
    };

    let endpoints = |sub: &str, kind: EndpointKind| -> anyhow::Result<Option<Vec<Endpoint>>> {
        let Some(files) = discover_tree_files(root, sub).with_context(|| format!("discover {sub}"))?
        else {
            return Ok(None);
        };
        parse_files(&files, |value, stem| parse::parse_endpoint(value, kind, stem)).map(Some)
    };

    Ok(BundleModel {
        policies,
        proxies: endpoints(PROXIES_DIR, EndpointKind::ProxyEndpoint)?,
        targets: endpoints(TARGETS_DIR, EndpointKind::TargetEndpoint)?,
    })
}

/// Read and parse files in parallel; results keep the (sorted) input order.
fn parse_files<T, F>(files: &[Utf8PathBuf], parse_tree: F) -> anyhow::Result<Vec<T>>
where
    T: Send,
    F: Fn(&Value, &str) -> anyhow::Result<T> + Sync,
{
    files
        .par_iter()
        .map(|path| {
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            let value: Value =
                serde_json::from_str(&text).with_context(|| format!("parse JSON {path}"))?;
            let stem = parse::fallback_name(path.file_stem());
            parse_tree(&value, &stem).with_context(|| format!("parse {path}"))
        })
        .collect()
}

fn log_policy_issues(policies: &[PolicyDefinition]) {
    let mut seen = HashSet::new();
    for p in policies {
        if !seen.insert(p.name.as_str()) {
            warn!(policy = %p.name, "duplicate policy name; keeping the first definition");
        }
        // Disabled policies still count as attached.
        if !p.is_enabled() {
            debug!(policy = %p.name, "policy is disabled");
        }
    }
}
