//! Secondary key derivation
//!
//! Computes the denormalized partition keys that place a `Place` into the
//! three secondary indexes:
//!
//! | Key | Partition value | Range attribute | Condition |
//! |-----|-----------------|-----------------|-----------|
//! | `keyInAdmin1` | `COUNTRY.ADMIN1` | population | has admin1, not itself an ADM1 |
//! | `keyAdmin1` | `COUNTRY` | admin1Code | class `A`, code `ADM1` |
//! | `keyMain` | `COUNTRY` | population | class `P`, capital code or populous |
//!
//! Derivation is pure: no I/O, no clock, no randomness. Missing inputs
//! suppress the corresponding key instead of failing.

use crate::types::{FeatureClass, Place};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature code of a first-order administrative division
pub const ADM1_CODE: &str = "ADM1";

// ============================================================================
// MainPlacePolicy
// ============================================================================

/// Which populated places count as "main places" of a country
///
/// Capital codes qualify unconditionally. Other codes qualify only when
/// listed in `population_thresholds` and the place population is at or
/// above the threshold for that code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPlacePolicy {
    /// Feature codes that always qualify (upper-case)
    #[serde(default = "default_capital_codes")]
    pub capital_codes: Vec<String>,
    /// Minimum population per qualifying generic feature code (upper-case)
    #[serde(default = "default_population_thresholds")]
    pub population_thresholds: BTreeMap<String, u64>,
}

fn default_capital_codes() -> Vec<String> {
    vec!["PPLC".to_string(), "PPLA".to_string()]
}

fn default_population_thresholds() -> BTreeMap<String, u64> {
    let mut thresholds = BTreeMap::new();
    thresholds.insert("PPL".to_string(), 100_000);
    thresholds.insert("PPLA2".to_string(), 100_000);
    thresholds
}

impl Default for MainPlacePolicy {
    fn default() -> Self {
        MainPlacePolicy {
            capital_codes: default_capital_codes(),
            population_thresholds: default_population_thresholds(),
        }
    }
}

impl MainPlacePolicy {
    /// Whether a normalized feature code with the given population qualifies
    pub fn qualifies(&self, feature_code: &str, population: Option<u64>) -> bool {
        if self
            .capital_codes
            .iter()
            .any(|code| code.eq_ignore_ascii_case(feature_code))
        {
            return true;
        }
        match (self.threshold_for(feature_code), population) {
            (Some(threshold), Some(population)) => population >= threshold,
            _ => false,
        }
    }

    /// Population threshold for a feature code, if the code is eligible
    pub fn threshold_for(&self, feature_code: &str) -> Option<u64> {
        self.population_thresholds
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(feature_code))
            .map(|(_, threshold)| *threshold)
    }
}

// ============================================================================
// DerivedKeys
// ============================================================================

/// The three secondary partition keys of a place
///
/// Any combination may be present. `None` means the place does not belong
/// to that index and any previously stored key must be removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedKeys {
    /// Partition of the places-in-admin1 index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_in_admin1: Option<String>,
    /// Partition of the admin1-areas index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_admin1: Option<String>,
    /// Partition of the main-places index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_main: Option<String>,
}

impl DerivedKeys {
    /// No key at all
    pub fn none() -> Self {
        DerivedKeys::default()
    }

    /// Number of keys present
    pub fn count(&self) -> usize {
        [&self.key_in_admin1, &self.key_admin1, &self.key_main]
            .iter()
            .filter(|k| k.is_some())
            .count()
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Derive all three keys for a (possibly partial) place
pub fn derive_keys(place: &Place, policy: &MainPlacePolicy) -> DerivedKeys {
    DerivedKeys {
        key_in_admin1: key_in_admin1(place),
        key_admin1: key_admin1(place),
        key_main: key_main(place, policy),
    }
}

/// `COUNTRY.ADMIN1` for places inside an admin1 area, except ADM1 areas themselves
pub fn key_in_admin1(place: &Place) -> Option<String> {
    let country = non_empty(&place.country_code)?;
    let admin1 = non_empty(&place.admin1_code)?;
    let code = non_empty(&place.feature_code)?;
    if normalize(code) == ADM1_CODE {
        return None;
    }
    Some(format_key_in_admin1(country, admin1))
}

/// `COUNTRY` for first-order administrative areas
pub fn key_admin1(place: &Place) -> Option<String> {
    let country = non_empty(&place.country_code)?;
    let class = place.feature_class?;
    let code = non_empty(&place.feature_code)?;
    if class == FeatureClass::AdminArea && normalize(code) == ADM1_CODE {
        Some(format_key_admin1(country))
    } else {
        None
    }
}

/// `COUNTRY` for capitals and populous places
pub fn key_main(place: &Place, policy: &MainPlacePolicy) -> Option<String> {
    let country = non_empty(&place.country_code)?;
    let class = place.feature_class?;
    let code = non_empty(&place.feature_code)?;
    if class == FeatureClass::PopulatedPlace && policy.qualifies(&normalize(code), place.population)
    {
        Some(format_key_main(country))
    } else {
        None
    }
}

/// Partition value of the places-in-admin1 index
pub fn format_key_in_admin1(country_code: &str, admin1_code: &str) -> String {
    format!("{}.{}", normalize(country_code), normalize(admin1_code))
}

/// Partition value of the admin1-areas index
pub fn format_key_admin1(country_code: &str) -> String {
    normalize(country_code)
}

/// Partition value of the main-places index
pub fn format_key_main(country_code: &str) -> String {
    normalize(country_code)
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
