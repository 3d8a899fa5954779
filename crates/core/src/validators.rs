//! Validator identity resolution.
//!
//! Maps validator addresses to display names. Built once from the system
//! state query and read-only afterwards; an empty directory is the offline
//! fallback, not an error state.

use std::collections::HashMap;

/// Fallback name for addresses the directory cannot resolve.
pub const UNKNOWN_VALIDATOR: &str = "Unknown Validator";

/// Ad hoc overrides for operators recognizable by address prefix even when
/// the directory query failed. Isolated lookup table; there is no general
/// rule behind these entries.
pub const KNOWN_OPERATOR_PREFIXES: &[(&str, &str)] = &[("0xa36a", "Nansen (Detected)")];

/// Address → display name map with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct ValidatorDirectory {
    names: HashMap<String, String>,
}

impl ValidatorDirectory {
    /// Empty directory (offline mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (address, name) pairs.
    pub fn from_entries<I, A, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, N)>,
        A: AsRef<str>,
        N: Into<String>,
    {
        let mut directory = Self::new();
        for (address, name) in entries {
            directory.insert(address, name);
        }
        directory
    }

    /// Register one validator. Addresses are lower-cased on insertion.
    pub fn insert(&mut self, address: impl AsRef<str>, name: impl Into<String>) {
        self.names
            .insert(address.as_ref().to_lowercase(), name.into());
    }

    /// Resolve an address to a display name.
    ///
    /// Unknown addresses fall back to a known-operator prefix match, then to
    /// [`UNKNOWN_VALIDATOR`].
    pub fn resolve(&self, address: &str) -> String {
        let address = address.to_lowercase();
        if let Some(name) = self.names.get(&address) {
            return name.clone();
        }
        for (prefix, label) in KNOWN_OPERATOR_PREFIXES {
            if address.starts_with(prefix) {
                return (*label).to_string();
            }
        }
        UNKNOWN_VALIDATOR.to_string()
    }

    /// Number of known validators.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory has no entries (offline mode).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
