use regex::Regex;
use std::sync::OnceLock;

/// Product assumed for plain `X.Y.Z` fix versions
const DEFAULT_PRODUCT: &str = "quay";

/// Matches `[product ]vX.Y[.Z]` anywhere in a ticket summary, e.g.
/// "Release Quay v3.16.2" or "⦗konflux⦘ Quay v3.15.3".
fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:(\w+)\s+)?v?(\d+\.\d+(?:\.\d+)?)").unwrap())
}

/// Product and version extracted from a release ticket summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// Lowercased product token, empty when the summary had none
    pub product: String,
    pub version: String,
}

impl ParsedVersion {
    /// Tracker fix-version label for this version.
    ///
    /// `product-vX.Y.Z`, or the bare version when no product was matched
    /// (the word "release" in "Release 3.17" is not a product).
    pub fn fix_version(&self) -> String {
        if self.product.is_empty() || self.product == "release" {
            self.version.clone()
        } else {
            format!("{}-v{}", self.product, self.version)
        }
    }
}

/// VersionParser derives fix versions and artifact-store application names
///
/// The summary pattern is intentionally permissive: any `word X.Y` pair in the
/// summary is accepted and the product word is not checked against a list of
/// known products. Discovery already restricts the search to release-tracking
/// tickets.
pub struct VersionParser;

impl VersionParser {
    /// Extracts product and version from a ticket summary
    ///
    /// # Returns
    /// `None` when the summary holds no `X.Y` version
    pub fn parse_summary(summary: &str) -> Option<ParsedVersion> {
        let captures = version_regex().captures(summary)?;
        let product = captures
            .get(1)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        let version = captures.get(2)?.as_str().to_string();
        Some(ParsedVersion { product, version })
    }

    /// Maps a fix version to the application prefix in the artifact store
    ///
    /// - `omr-v2.0.10` → `omr-v2-0`
    /// - `3.16.3` → `quay-v3-16`
    ///
    /// Returns `None` when the version has fewer than two components.
    pub fn application_for(fix_version: &str) -> Option<String> {
        let (product, version) = match fix_version.find("-v") {
            Some(idx) if idx > 0 => (&fix_version[..idx], &fix_version[idx + 2..]),
            _ => (DEFAULT_PRODUCT, fix_version),
        };

        let mut parts = version.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
                Some(format!("{}-v{}-{}", product, major, minor))
            }
            _ => None,
        }
    }

    /// Recovers a bare version from an application prefix
    ///
    /// - `quay-v3-16` → `3.16`
    /// - `omr-v2-0-10` → `2.0.10`
    ///
    /// The version starts at the first `v<digits>` segment and continues over
    /// the numeric segments that follow it.
    pub fn version_for_application(application: &str) -> Option<String> {
        let mut segments = application.split('-');
        let first = segments.find_map(|segment| {
            segment
                .strip_prefix('v')
                .filter(|rest| is_numeric(rest))
        })?;

        let mut version = vec![first];
        version.extend(segments.take_while(|segment| is_numeric(segment)));
        Some(version.join("."))
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
