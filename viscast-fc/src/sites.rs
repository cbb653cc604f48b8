//! Site profile registry
//!
//! Immutable catalog of dive site physical characteristics. Constructed once
//! at startup from the config's site table (or the built-in one) and passed
//! explicitly into the components that need it. Construction order is
//! significant: it is both the display order and the tie-break order for the
//! best-pick selection.

use viscast_common::models::SiteProfile;
use viscast_common::{Error, Result};

/// Built-in San Diego shore-site table, used when the config has no
/// `[[sites]]` entries.
pub fn builtin_sites() -> Vec<SiteProfile> {
    vec![
        SiteProfile {
            name: "La Jolla Cove".to_string(),
            base_score: 4,
            swell_exposure: 0.4,
            runoff_sensitivity: 0.3,
            kelp_index: 0.2,
            camera_url: Some("https://www.sandiego.gov/lifeguards/beaches/cove".to_string()),
        },
        SiteProfile {
            name: "La Jolla Shores".to_string(),
            base_score: 3,
            swell_exposure: 0.6,
            runoff_sensitivity: 0.5,
            kelp_index: 0.0,
            camera_url: None,
        },
        SiteProfile {
            name: "Marine Room".to_string(),
            base_score: 3,
            swell_exposure: 0.5,
            runoff_sensitivity: 0.4,
            kelp_index: 0.1,
            camera_url: None,
        },
        SiteProfile {
            name: "Hospital Point".to_string(),
            base_score: 3,
            swell_exposure: 0.8,
            runoff_sensitivity: 0.2,
            kelp_index: 0.5,
            camera_url: None,
        },
        SiteProfile {
            name: "Casa Cove".to_string(),
            base_score: 2,
            swell_exposure: 0.7,
            runoff_sensitivity: 0.3,
            kelp_index: 0.3,
            camera_url: None,
        },
    ]
}

/// Immutable, ordered catalog of site profiles.
///
/// Read-only after construction; there is no mutation API.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteProfile>,
}

impl SiteRegistry {
    /// Build a registry, validating every profile.
    ///
    /// Fails fast on the first out-of-range field and rejects an empty
    /// table: no forecast can be produced from zero sites.
    pub fn new(sites: Vec<SiteProfile>) -> Result<Self> {
        if sites.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        for site in &sites {
            site.validate()?;
        }
        Ok(Self { sites })
    }

    /// Registry from the config's site table, or the built-in one.
    pub fn from_config(configured: Option<Vec<SiteProfile>>) -> Result<Self> {
        Self::new(configured.unwrap_or_else(builtin_sites))
    }

    /// All profiles in registry order
    pub fn sites(&self) -> &[SiteProfile] {
        &self.sites
    }

    /// Look up a profile by exact name
    pub fn lookup(&self, name: &str) -> Result<&SiteProfile> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::NotFound(format!("site {:?}", name)))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, base: u8) -> SiteProfile {
        SiteProfile {
            name: name.to_string(),
            base_score: base,
            swell_exposure: 0.5,
            runoff_sensitivity: 0.2,
            kelp_index: 0.1,
            camera_url: None,
        }
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let registry = SiteRegistry::from_config(None).unwrap();
        assert_eq!(registry.len(), 5);
        // Registry preserves construction order
        assert_eq!(registry.sites()[0].name, "La Jolla Cove");
        assert_eq!(registry.sites()[4].name, "Casa Cove");
    }

    #[test]
    fn test_empty_registry_is_fatal() {
        assert!(matches!(
            SiteRegistry::new(Vec::new()),
            Err(Error::EmptyRegistry)
        ));
    }

    #[test]
    fn test_construction_fails_fast_on_invalid_profile() {
        let mut bad = profile("Bad Site", 3);
        bad.kelp_index = 2.0;
        let result = SiteRegistry::new(vec![profile("Good Site", 3), bad]);
        assert!(matches!(result, Err(Error::InvalidProfile { .. })));
    }

    #[test]
    fn test_lookup() {
        let registry = SiteRegistry::new(vec![profile("A", 2), profile("B", 4)]).unwrap();
        assert_eq!(registry.lookup("B").unwrap().base_score, 4);
        assert!(matches!(registry.lookup("C"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_configured_sites_replace_builtin() {
        let registry =
            SiteRegistry::from_config(Some(vec![profile("Custom Reef", 5)])).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sites()[0].name, "Custom Reef");
    }
}
