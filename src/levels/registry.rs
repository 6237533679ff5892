//! Severity levels and name resolution.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::error::{LoggingError, Result};

/// Ordinal severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    NotSet = 0,
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::NotSet,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name, as written to the `severity` field.
    pub fn name(self) -> &'static str {
        match self {
            Severity::NotSet => "notset",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// True when a record at this severity passes `threshold`.
    pub fn is_enabled_for(self, threshold: Severity) -> bool {
        self.ordinal() >= threshold.ordinal()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s)
    }
}

lazy_static! {
    static ref NAME_TO_LEVEL: HashMap<&'static str, Severity> = {
        let mut m = HashMap::new();
        m.insert("critical", Severity::Critical);
        m.insert("exception", Severity::Error);
        m.insert("error", Severity::Error);
        m.insert("warn", Severity::Warning);
        m.insert("warning", Severity::Warning);
        m.insert("info", Severity::Info);
        m.insert("debug", Severity::Debug);
        m.insert("notset", Severity::NotSet);
        m
    };
}

/// Every name `resolve` accepts, lowercase.
pub fn level_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NAME_TO_LEVEL.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Resolve a severity name, ignoring case.
///
/// Unknown names fail with [`LoggingError::Configuration`]. Falling back to
/// `NotSet` would turn a typo into maximum verbosity.
pub fn resolve(name: &str) -> Result<Severity> {
    let key = name.to_lowercase();
    NAME_TO_LEVEL
        .get(key.as_str())
        .copied()
        .ok_or_else(|| LoggingError::Configuration {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_documented_names() {
        assert_eq!(resolve("critical").unwrap(), Severity::Critical);
        assert_eq!(resolve("exception").unwrap(), Severity::Error);
        assert_eq!(resolve("error").unwrap(), Severity::Error);
        assert_eq!(resolve("warn").unwrap(), Severity::Warning);
        assert_eq!(resolve("warning").unwrap(), Severity::Warning);
        assert_eq!(resolve("info").unwrap(), Severity::Info);
        assert_eq!(resolve("debug").unwrap(), Severity::Debug);
        assert_eq!(resolve("notset").unwrap(), Severity::NotSet);
        assert_eq!(level_names().len(), 8);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve("WARNING").unwrap(), Severity::Warning);
        assert_eq!(resolve("NotSet").unwrap(), Severity::NotSet);
        assert_eq!("Exception".parse::<Severity>().unwrap(), Severity::Error);
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        for bad in ["", "fatal", "trace", " info", "warnings"] {
            match resolve(bad) {
                Err(LoggingError::Configuration { name }) => assert_eq!(name, bad),
                other => panic!("expected configuration error for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_ordinals() {
        let ordinals: Vec<u8> = Severity::ALL.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(Severity::Warning.is_enabled_for(Severity::Warning));
        assert!(!Severity::Info.is_enabled_for(Severity::Warning));
        assert!(Severity::Debug.is_enabled_for(Severity::NotSet));
    }

    fn any_casing(name: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), name.len()).prop_map(move |upper| {
            name.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_known_names_resolve_in_any_casing(
            (name, cased) in proptest::sample::select(level_names())
                .prop_flat_map(|n| (Just(n), any_casing(n)))
        ) {
            prop_assert_eq!(resolve(&cased).unwrap(), resolve(name).unwrap());
        }

        #[test]
        fn prop_unknown_names_fail(name in "[a-zA-Z_]{0,12}") {
            prop_assume!(!level_names().contains(&name.to_lowercase().as_str()));
            let is_config_error = matches!(resolve(&name), Err(LoggingError::Configuration { .. }));
            prop_assert!(is_config_error);
        }

        #[test]
        fn prop_threshold_matches_ordinals(
            level in proptest::sample::select(Severity::ALL.to_vec()),
            threshold in proptest::sample::select(Severity::ALL.to_vec()),
        ) {
            prop_assert_eq!(
                level.is_enabled_for(threshold),
                level.ordinal() >= threshold.ordinal()
            );
        }
    }
}
