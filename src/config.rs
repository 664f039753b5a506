use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Institution-specific identity configuration, loadable from a JSON file.
/// All addresses are compared after lowercase normalization, so every entry
/// here should be lowercase too. Missing fields fall back to the defaults
/// below (the Glasgow deployment this tool was first written for).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Alternate address -> canonical address, e.g. a personal email a
    /// participant signed in with before switching to their institutional one.
    pub aliases: BTreeMap<String, String>,
    /// Domain suffixes of staff/demonstrator addresses to exclude from reports.
    pub excluded_domains: Vec<String>,
    /// Manually curated staff addresses indistinguishable from student ones.
    pub excluded_emails: Vec<String>,
    /// Domain suffixes of official institutional student addresses.
    pub verified_domains: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            aliases: BTreeMap::new(),
            excluded_domains: vec![
                "@glasgow.ac.uk".to_string(),
                "@research.glasgow.ac.uk".to_string(),
                "@gla.ac.uk".to_string(),
                "@research.gla.ac.uk".to_string(),
            ],
            excluded_emails: Vec::new(),
            verified_domains: vec!["@student.gla.ac.uk".to_string()],
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
