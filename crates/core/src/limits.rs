//! Input validation for places and read parameters
//!
//! Every write and read parameter is checked here before the repository
//! touches a store. Violations return `PlaceError::Validation` naming the
//! offending field.

use crate::error::{PlaceError, PlaceResult};
use crate::types::{FieldValue, Place, PlaceField, PlaceUpdate};
use std::collections::HashSet;

/// Size and shape limits for place attributes
#[derive(Debug, Clone)]
pub struct PlaceLimits {
    /// Maximum trimmed length of `name` and `asciiname` (default: 200)
    pub max_name_len: usize,

    /// Maximum length of `featureCode` (default: 10)
    pub max_feature_code_len: usize,

    /// Maximum trimmed length of admin codes (default: 10)
    pub max_admin_code_len: usize,
}

impl Default for PlaceLimits {
    fn default() -> Self {
        PlaceLimits {
            max_name_len: 200,
            max_feature_code_len: 10,
            max_admin_code_len: 10,
        }
    }
}

impl PlaceLimits {
    /// Validate a place about to be created
    ///
    /// All required fields must be present and every present field must be
    /// well-formed.
    pub fn validate_new(&self, place: &Place) -> PlaceResult<()> {
        if !place.id.is_valid() {
            return Err(PlaceError::validation("id", "must be a positive number"));
        }
        for field in PlaceField::ALL {
            if field.is_required() && !place.has(field) {
                return Err(PlaceError::validation(field.as_str(), "is required"));
            }
        }
        for value in present_values(place) {
            self.validate_value(&value)?;
        }
        Ok(())
    }

    /// Validate a partial update
    ///
    /// Rejects empty updates, removal of required fields, overlap between
    /// `set` and `remove`, and malformed values.
    pub fn validate_update(&self, update: &PlaceUpdate) -> PlaceResult<()> {
        if !update.id.is_valid() {
            return Err(PlaceError::validation("id", "must be a positive number"));
        }
        if update.is_empty() {
            return Err(PlaceError::validation(
                "update",
                "must set or remove at least one field",
            ));
        }

        let mut set_fields = HashSet::new();
        for value in &update.set {
            if !set_fields.insert(value.field()) {
                return Err(PlaceError::validation(
                    value.field().as_str(),
                    "is set more than once",
                ));
            }
            self.validate_value(value)?;
        }

        for field in &update.remove {
            if field.is_required() {
                return Err(PlaceError::validation(
                    field.as_str(),
                    "is required and cannot be removed",
                ));
            }
            if set_fields.contains(field) {
                return Err(PlaceError::validation(
                    field.as_str(),
                    "cannot be both set and removed",
                ));
            }
        }
        Ok(())
    }

    /// Validate a single attribute value
    pub fn validate_value(&self, value: &FieldValue) -> PlaceResult<()> {
        let field = value.field().as_str();
        match value {
            FieldValue::Name(v) | FieldValue::AsciiName(v) => {
                self.check_trimmed_len(field, v, self.max_name_len)
            }
            FieldValue::Names(v) | FieldValue::Timezone(v) => {
                if v.trim().is_empty() {
                    Err(PlaceError::validation(field, "must not be empty"))
                } else {
                    Ok(())
                }
            }
            FieldValue::Latitude(v) => check_range(field, *v, 90.0),
            FieldValue::Longitude(v) => check_range(field, *v, 180.0),
            FieldValue::FeatureClass(_) => Ok(()),
            FieldValue::FeatureCode(v) => {
                if v.is_empty() || v.len() > self.max_feature_code_len {
                    return Err(PlaceError::validation(
                        field,
                        format!("length must be 1..={}", self.max_feature_code_len),
                    ));
                }
                if v.chars().any(|c| c.is_lowercase()) {
                    return Err(PlaceError::validation(field, "must be upper-case"));
                }
                Ok(())
            }
            FieldValue::CountryCode(v) => {
                if v.len() == 2 && v.chars().all(|c| c.is_ascii_lowercase()) {
                    Ok(())
                } else {
                    Err(PlaceError::validation(
                        field,
                        "must be two lower-case ASCII letters",
                    ))
                }
            }
            FieldValue::Admin1Code(v) | FieldValue::Admin2Code(v) | FieldValue::Admin3Code(v) => {
                self.check_trimmed_len(field, v, self.max_admin_code_len)
            }
            FieldValue::WikiId(v) => {
                let digits = v.strip_prefix('Q').unwrap_or_default();
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(PlaceError::validation(field, "must look like Q123"))
                }
            }
            FieldValue::Population(_)
            | FieldValue::Elevation(_)
            | FieldValue::Dem(_)
            | FieldValue::UpdatedAt(_) => Ok(()),
        }
    }

    fn check_trimmed_len(&self, field: &str, value: &str, max: usize) -> PlaceResult<()> {
        let len = value.trim().chars().count();
        if len == 0 || len > max {
            return Err(PlaceError::validation(
                field,
                format!("trimmed length must be 1..={}", max),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, bound: f64) -> PlaceResult<()> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(PlaceError::validation(
            field,
            format!("must be within [-{}, {}]", bound, bound),
        ))
    }
}

/// Present attributes of a place, as typed values
fn present_values(place: &Place) -> Vec<FieldValue> {
    let mut values = Vec::new();
    let mut push = |value: Option<FieldValue>| values.extend(value);
    push(place.name.clone().map(FieldValue::Name));
    push(place.ascii_name.clone().map(FieldValue::AsciiName));
    push(place.names.clone().map(FieldValue::Names));
    push(place.latitude.map(FieldValue::Latitude));
    push(place.longitude.map(FieldValue::Longitude));
    push(place.feature_class.map(FieldValue::FeatureClass));
    push(place.feature_code.clone().map(FieldValue::FeatureCode));
    push(place.country_code.clone().map(FieldValue::CountryCode));
    push(place.admin1_code.clone().map(FieldValue::Admin1Code));
    push(place.admin2_code.clone().map(FieldValue::Admin2Code));
    push(place.admin3_code.clone().map(FieldValue::Admin3Code));
    push(place.population.map(FieldValue::Population));
    push(place.elevation.map(FieldValue::Elevation));
    push(place.dem.map(FieldValue::Dem));
    push(place.timezone.clone().map(FieldValue::Timezone));
    push(place.wiki_id.clone().map(FieldValue::WikiId));
    push(place.updated_at.map(FieldValue::UpdatedAt));
    values
}

// ============================================================================
// Read parameters
// ============================================================================

/// Validate a country code read parameter (case-insensitive, 2 letters)
pub fn validate_country_param(param: &str, country: &str) -> PlaceResult<()> {
    let trimmed = country.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(PlaceError::validation(param, "must be a two-letter country code"))
    }
}

/// Validate a non-empty string read parameter
pub fn validate_text_param(param: &str, value: &str) -> PlaceResult<()> {
    if value.trim().is_empty() {
        Err(PlaceError::validation(param, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Validate a result limit
pub fn validate_limit_param(param: &str, limit: usize) -> PlaceResult<()> {
    if limit == 0 {
        Err(PlaceError::validation(param, "must be positive"))
    } else {
        Ok(())
    }
}
