//! Detector profile registry.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::config::DetectionConfig;
use crate::error::{Error, Result};
use crate::image::ImportedImage;
use crate::profile::{open_candidate, DetectorProfile};
use crate::profiles;

/// Ordered set of detector profiles. Detection tries them in registration
/// order and stops at the first match.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    profiles: Vec<DetectorProfile>,
    by_name: HashMap<&'static str, usize>,
}

impl FormatRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry holding every built-in profile.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for profile in profiles::builtin() {
            registry
                .register(profile)
                .expect("built-in profile names are unique");
        }
        registry
    }

    /// Append a profile. Returns error if the name is already taken.
    pub fn register(&mut self, profile: DetectorProfile) -> Result<()> {
        if self.by_name.contains_key(profile.name) {
            return Err(Error::AlreadyRegistered {
                name: profile.name.into(),
            });
        }

        info!(
            name = profile.name,
            shape = ?profile.shape,
            gate = ?profile.gate,
            "Profile registered"
        );

        self.by_name.insert(profile.name, self.profiles.len());
        self.profiles.push(profile);
        Ok(())
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&DetectorProfile> {
        self.by_name.get(name).map(|&i| &self.profiles[i])
    }

    /// Profiles in detection order.
    pub fn profiles(&self) -> &[DetectorProfile] {
        &self.profiles
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    /// First profile that understands `path`, or `None`.
    ///
    /// The container is read once and shared between profile checks.
    pub fn identify(
        &self,
        path: impl AsRef<Path>,
        config: &DetectionConfig,
    ) -> Option<&DetectorProfile> {
        let path = path.as_ref();
        let container = open_candidate(path)?;

        let found = self
            .profiles
            .iter()
            .find(|profile| profile.matches(&container, config));
        debug!(
            path = %path.display(),
            profile = found.map(|p| p.name),
            "Identified"
        );
        found
    }

    /// Whether the named profile understands `path`.
    pub fn understands(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        config: &DetectionConfig,
    ) -> Result<bool> {
        let profile = self.get(name).ok_or_else(|| Error::NotFound { name: name.into() })?;
        Ok(profile.understand(path, config))
    }

    /// Identify `path` and build its models.
    pub fn open(&self, path: impl AsRef<Path>, config: &DetectionConfig) -> Result<ImportedImage> {
        let path = path.as_ref();
        let profile = self.identify(path, config).ok_or_else(|| Error::Unrecognized {
            path: path.display().to_string(),
        })?;
        ImportedImage::from_profile(path, profile)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = FormatRegistry::with_builtin();
        let names: Vec<_> = registry.profiles().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["merlin", "asi", "tecnai-g2", "medipix", "ued", "ued-bnl"]
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = FormatRegistry::with_builtin();
        let err = registry.register(profiles::ASI).unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered { ref name } if name == "asi"));
        assert_eq!(registry.count(), 6);
    }

    #[test]
    fn test_get() {
        let registry = FormatRegistry::with_builtin();
        assert_eq!(registry.get("medipix").unwrap().shape, (514, 514));
        assert!(registry.get("pilatus").is_none());
    }

    #[test]
    fn test_understands_unknown_profile() {
        let registry = FormatRegistry::new();
        let err = registry
            .understands("merlin", "frame_001.tif", &DetectionConfig::new())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_identify_missing_file() {
        let registry = FormatRegistry::with_builtin();
        let config = DetectionConfig::new().merlin(true).ued_bnl(true);
        assert!(registry.identify("/nonexistent/frame_001.tif", &config).is_none());
    }
}
