//! Detection configuration.
//!
//! Some profiles match on image shape alone, which would claim any TIFF of
//! that size. Those profiles stay disabled until their flag is set here.

use serde::{Deserialize, Serialize};

/// Environment variable enabling the Merlin profile.
pub const MERLIN_ENV: &str = "QD_MERLIN_TIFF";

/// Environment variable enabling the UED BNL profile.
pub const UED_BNL_ENV: &str = "UED_BNL_TIFF";

/// Flags gating shape-only profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Quantum Detectors Merlin, 512x512.
    Merlin,
    /// UED instrument at BNL, 512x512.
    UedBnl,
}

impl Gate {
    /// Environment variable whose presence enables the gate.
    pub fn env_var(self) -> &'static str {
        match self {
            Gate::Merlin => MERLIN_ENV,
            Gate::UedBnl => UED_BNL_ENV,
        }
    }
}

/// Flags passed to every detection call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Allow the Merlin profile to match.
    pub merlin: bool,
    /// Allow the UED BNL profile to match.
    pub ued_bnl: bool,
}

impl DetectionConfig {
    /// All gated profiles disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read gates from the process environment. Only presence matters;
    /// the value is ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).is_some())
    }

    /// Build from an arbitrary "is this variable set" lookup.
    #[must_use]
    pub fn from_lookup(is_set: impl Fn(&str) -> bool) -> Self {
        Self {
            merlin: is_set(MERLIN_ENV),
            ued_bnl: is_set(UED_BNL_ENV),
        }
    }

    /// Enable or disable the Merlin profile.
    #[must_use]
    pub fn merlin(mut self, enabled: bool) -> Self {
        self.merlin = enabled;
        self
    }

    /// Enable or disable the UED BNL profile.
    #[must_use]
    pub fn ued_bnl(mut self, enabled: bool) -> Self {
        self.ued_bnl = enabled;
        self
    }

    /// Combine with another configuration; a gate is open if either opens it.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            merlin: self.merlin || other.merlin,
            ued_bnl: self.ued_bnl || other.ued_bnl,
        }
    }

    /// Whether `gate` is open.
    pub fn allows(&self, gate: Gate) -> bool {
        match gate {
            Gate::Merlin => self.merlin,
            Gate::UedBnl => self.ued_bnl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_closed() {
        let config = DetectionConfig::new();
        assert!(!config.allows(Gate::Merlin));
        assert!(!config.allows(Gate::UedBnl));
    }

    #[test]
    fn test_builder() {
        let config = DetectionConfig::new().merlin(true);
        assert!(config.allows(Gate::Merlin));
        assert!(!config.allows(Gate::UedBnl));
    }

    #[test]
    fn test_from_lookup_presence_only() {
        let config = DetectionConfig::from_lookup(|name| name == "UED_BNL_TIFF");
        assert_eq!(config, DetectionConfig::new().ued_bnl(true));
    }

    #[test]
    fn test_union() {
        let merged = DetectionConfig::new()
            .merlin(true)
            .union(DetectionConfig::new().ued_bnl(true));
        assert!(merged.merlin && merged.ued_bnl);
    }

    #[test]
    fn test_env_var_names() {
        assert_eq!(Gate::Merlin.env_var(), "QD_MERLIN_TIFF");
        assert_eq!(Gate::UedBnl.env_var(), "UED_BNL_TIFF");
    }
}
