#![deny(warnings)]

//! Metric help text, embedded at build time from `assets/help/metrics.yaml`.
//!
//! Keys match the field and metric names used by the calculators
//! (`aov`, `breakEvenROAS`, `currentCPL`, `brandRoas`, ...).

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

const METRICS_YAML: &str = include_str!("../../../assets/help/metrics.yaml");

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InfoContent {
    pub title: String,
    pub explanation: String,
    pub example: String,
}

pub type Catalog = BTreeMap<String, InfoContent>;

#[derive(Debug, Error)]
pub enum HelpError {
    #[error("help catalogue is malformed: {0}")]
    Malformed(String),
    #[error("no help entry for {0:?}")]
    UnknownKey(String),
}

static CATALOG: Lazy<Result<Catalog, String>> = Lazy::new(|| {
    let parsed = parse(METRICS_YAML).map_err(|e| e.to_string());
    if let Ok(catalog) = &parsed {
        tracing::debug!(entries = catalog.len(), "help catalogue loaded");
    }
    parsed
});

/// Parse a help catalogue document.
pub fn parse(text: &str) -> Result<Catalog, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// The embedded catalogue, parsed once.
pub fn catalog() -> Result<&'static Catalog, HelpError> {
    CATALOG
        .as_ref()
        .map_err(|e| HelpError::Malformed(e.clone()))
}

/// Help entry for a metric key, if there is one.
pub fn lookup(key: &str) -> Option<&'static InfoContent> {
    catalog().ok()?.get(key)
}

/// Like [`lookup`], but a missing key is an error.
pub fn explain(key: &str) -> Result<&'static InfoContent, HelpError> {
    catalog()?
        .get(key)
        .ok_or_else(|| HelpError::UnknownKey(key.to_string()))
}
