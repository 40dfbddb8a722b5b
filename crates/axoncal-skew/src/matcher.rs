//! Layer Matcher - Selecting Layers to Observe
//!
//! A layer is selected when its full dotted name contains at least one
//! target as a plain, case-sensitive substring. Selection keeps the order
//! of the model's own enumeration.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

/// Returns true if `name` contains any of `targets`.
pub fn matches_any<S: AsRef<str>>(name: &str, targets: &[S]) -> bool {
    targets.iter().any(|t| name.contains(t.as_ref()))
}

/// Keeps the `(name, item)` pairs whose name matches any target.
///
/// An empty target list selects nothing.
pub fn match_layers<T, S, I>(named: I, targets: &[S]) -> Vec<(String, T)>
where
    I: IntoIterator<Item = (String, T)>,
    S: AsRef<str>,
{
    named
        .into_iter()
        .filter(|(name, _)| matches_any(name, targets))
        .collect()
}

// =============================================================================
// LayerMatcher
// =============================================================================

/// Reusable set of target substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerMatcher {
    targets: Vec<String>,
}

impl LayerMatcher {
    /// Creates a matcher for the given substrings.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the target substrings.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Returns true when no target is configured.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns true if `name` is selected.
    pub fn is_match(&self, name: &str) -> bool {
        matches_any(name, &self.targets)
    }

    /// Keeps the selected `(name, item)` pairs in their original order.
    pub fn select<T>(&self, named: impl IntoIterator<Item = (String, T)>) -> Vec<(String, T)> {
        match_layers(named, &self.targets)
    }
}

// =============================================================================
// Tests
// =============================================================================
