use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical repo-relative path used by boundary containment.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - surrounding whitespace trimmed
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ChangePath(String);

impl ChangePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().trim().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this path falls under `prefix` (both normalized).
    pub fn is_within(&self, prefix: &ChangePath) -> bool {
        !prefix.0.is_empty() && self.0.starts_with(prefix.as_str())
    }
}

impl std::fmt::Display for ChangePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dot_prefix() {
        assert_eq!(ChangePath::new("./src\\app.py").as_str(), "src/app.py");
        assert_eq!(ChangePath::new("././docs/x.md").as_str(), "docs/x.md");
    }

    #[test]
    fn containment_is_prefix_based() {
        let src = ChangePath::new("src/");
        assert!(ChangePath::new("src/app.py").is_within(&src));
        assert!(!ChangePath::new("infra/main.tf").is_within(&src));
        assert!(!ChangePath::new("src/app.py").is_within(&ChangePath::new("")));
    }
}
