//! Memoization settings

use std::borrow::Cow;

use memokey::DEFAULT_MAX_DEPTH;

/// Label used in log events when none is configured
pub const DEFAULT_LABEL: &str = "memo";

/// Per-store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    /// Maximum nesting depth of a single argument before key derivation
    /// gives up with `Error::CyclicArgument`
    pub max_depth: usize,

    /// Name attached to this store's log events
    pub label: Cow<'static, str>,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            label: Cow::Borrowed(DEFAULT_LABEL),
        }
    }
}

impl MemoConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the argument nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the log label
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = MemoConfig::new().with_max_depth(4).with_label("prices");

        assert_eq!(config.max_depth, 4);
        assert_eq!(config.label, "prices");
        assert_eq!(MemoConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }
}
