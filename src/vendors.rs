use crate::types::HwAddr;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Manufacturer name returned for unknown prefixes and resolver sentinels.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Immutable OUI-prefix → manufacturer directory.
///
/// Built once at startup from a vendor prefix table and passed into the
/// orchestrator; never mutated afterwards, so it is safe to share across
/// concurrent tasks without synchronization.
#[derive(Debug, Clone, Default)]
pub struct VendorDb {
    by_prefix: HashMap<String, String>,
}

impl VendorDb {
    /// Parse vendor table content: one entry per line,
    /// `<6-hex-prefix><whitespace><manufacturer name, possibly multi-word>`.
    /// `#`-prefixed and blank lines are ignored, as are lines without a
    /// manufacturer field. Prefix keys are stored uppercased.
    pub fn parse_str(s: &str) -> VendorDb {
        let mut by_prefix = HashMap::new();
        for raw_line in s.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(prefix) = fields.next() else {
                continue;
            };
            let name = fields.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                continue;
            }
            by_prefix.insert(prefix.to_ascii_uppercase(), name);
        }
        VendorDb { by_prefix }
    }

    /// Load the vendor table from a file path. Errors if the file cannot be
    /// read; the caller decides whether that aborts the program.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<VendorDb> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read vendor table: {}", path.as_ref().display()))?;
        Ok(Self::parse_str(&content))
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    /// Manufacturer for a resolved hardware address, or `"Unknown"`.
    ///
    /// Sentinels carry no prefix and short-circuit to `"Unknown"` without a
    /// table probe.
    pub fn lookup(&self, hw: &HwAddr) -> &str {
        match hw.oui_prefix() {
            Some(prefix) => self
                .by_prefix
                .get(&prefix)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_VENDOR),
            None => UNKNOWN_VENDOR,
        }
    }
}
