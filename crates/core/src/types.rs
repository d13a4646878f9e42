//! Domain types for the place repository
//!
//! This module defines the foundational types used throughout the system:
//! - PlaceId: Caller-assigned positive identifier
//! - FeatureClass: Top-level geonames classification letter
//! - Place: The canonical entity, a closed set of optional attributes
//! - PlaceField / FieldValue: Typed attribute names and values
//! - PlaceUpdate: Partial update (set + remove)
//! - FieldSet: Attribute projection for reads
//! - OldPlaceId: Legacy id mapping row
//!
//! Derived secondary keys are NOT part of `Place`. They live in
//! [`crate::record::PlaceRecord`], which only storage adapters see.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PlaceId
// ============================================================================

/// Identifier of a place
///
/// Assigned by the caller, never generated. Valid ids are positive;
/// validation rejects zero before any store is touched.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlaceId(u64);

impl PlaceId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        PlaceId(id)
    }

    /// Raw numeric value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether the id is usable (positive)
    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<u64> for PlaceId {
    fn from(id: u64) -> Self {
        PlaceId(id)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// FeatureClass
// ============================================================================

/// Geonames feature class
///
/// Only `A` (administrative area) and `P` (populated place) drive secondary
/// key derivation; the others are stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureClass {
    /// Country, state, region
    #[serde(rename = "A")]
    AdminArea,
    /// Stream, lake
    #[serde(rename = "H")]
    Hydrographic,
    /// Parks, area
    #[serde(rename = "L")]
    Area,
    /// City, village
    #[serde(rename = "P")]
    PopulatedPlace,
    /// Road, railroad
    #[serde(rename = "R")]
    Road,
    /// Spot, building, farm
    #[serde(rename = "S")]
    Spot,
    /// Mountain, hill, rock
    #[serde(rename = "T")]
    Terrain,
    /// Undersea
    #[serde(rename = "U")]
    Undersea,
    /// Forest, heath
    #[serde(rename = "V")]
    Vegetation,
}

impl FeatureClass {
    /// All feature classes in letter order
    pub const ALL: [FeatureClass; 9] = [
        FeatureClass::AdminArea,
        FeatureClass::Hydrographic,
        FeatureClass::Area,
        FeatureClass::PopulatedPlace,
        FeatureClass::Road,
        FeatureClass::Spot,
        FeatureClass::Terrain,
        FeatureClass::Undersea,
        FeatureClass::Vegetation,
    ];

    /// Single-letter code as stored
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeatureClass::AdminArea => "A",
            FeatureClass::Hydrographic => "H",
            FeatureClass::Area => "L",
            FeatureClass::PopulatedPlace => "P",
            FeatureClass::Road => "R",
            FeatureClass::Spot => "S",
            FeatureClass::Terrain => "T",
            FeatureClass::Undersea => "U",
            FeatureClass::Vegetation => "V",
        }
    }
}

impl FromStr for FeatureClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FeatureClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown feature class '{}'", s))
    }
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Place
// ============================================================================

/// Canonical geographic place
///
/// Every attribute except `id` is optional at the type level: reads may be
/// projected to a subset of fields, and key derivation accepts partial
/// places. Required-on-create rules are enforced by
/// [`crate::limits::PlaceLimits`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Caller-assigned id
    pub id: PlaceId,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ASCII-normalized name
    #[serde(default, rename = "asciiname", skip_serializing_if = "Option::is_none")]
    pub ascii_name: Option<String>,
    /// Pipe-delimited localized name variants (`Iași[ro]|Jassy[de]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<String>,
    /// Latitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Feature class letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_class: Option<FeatureClass>,
    /// Feature code (`PPL`, `ADM1`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_code: Option<String>,
    /// Two-letter lowercase country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// First-order administrative subdivision code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1_code: Option<String>,
    /// Second-order administrative subdivision code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin2_code: Option<String>,
    /// Third-order administrative subdivision code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin3_code: Option<String>,
    /// Population
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,
    /// Digital elevation model value in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dem: Option<i32>,
    /// IANA timezone name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Wikidata id (`Q123`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_id: Option<String>,
    /// Unix seconds of the last update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl Place {
    /// Create an empty place carrying only its id
    pub fn new(id: impl Into<PlaceId>) -> Self {
        Place {
            id: id.into(),
            ..Place::default()
        }
    }

    /// Whether the given field currently holds a value
    pub fn has(&self, field: PlaceField) -> bool {
        match field {
            PlaceField::Id => true,
            PlaceField::Name => self.name.is_some(),
            PlaceField::AsciiName => self.ascii_name.is_some(),
            PlaceField::Names => self.names.is_some(),
            PlaceField::Latitude => self.latitude.is_some(),
            PlaceField::Longitude => self.longitude.is_some(),
            PlaceField::FeatureClass => self.feature_class.is_some(),
            PlaceField::FeatureCode => self.feature_code.is_some(),
            PlaceField::CountryCode => self.country_code.is_some(),
            PlaceField::Admin1Code => self.admin1_code.is_some(),
            PlaceField::Admin2Code => self.admin2_code.is_some(),
            PlaceField::Admin3Code => self.admin3_code.is_some(),
            PlaceField::Population => self.population.is_some(),
            PlaceField::Elevation => self.elevation.is_some(),
            PlaceField::Dem => self.dem.is_some(),
            PlaceField::Timezone => self.timezone.is_some(),
            PlaceField::WikiId => self.wiki_id.is_some(),
            PlaceField::UpdatedAt => self.updated_at.is_some(),
        }
    }

    /// Clear a field. Clearing `Id` is a no-op.
    pub fn clear(&mut self, field: PlaceField) {
        match field {
            PlaceField::Id => {}
            PlaceField::Name => self.name = None,
            PlaceField::AsciiName => self.ascii_name = None,
            PlaceField::Names => self.names = None,
            PlaceField::Latitude => self.latitude = None,
            PlaceField::Longitude => self.longitude = None,
            PlaceField::FeatureClass => self.feature_class = None,
            PlaceField::FeatureCode => self.feature_code = None,
            PlaceField::CountryCode => self.country_code = None,
            PlaceField::Admin1Code => self.admin1_code = None,
            PlaceField::Admin2Code => self.admin2_code = None,
            PlaceField::Admin3Code => self.admin3_code = None,
            PlaceField::Population => self.population = None,
            PlaceField::Elevation => self.elevation = None,
            PlaceField::Dem => self.dem = None,
            PlaceField::Timezone => self.timezone = None,
            PlaceField::WikiId => self.wiki_id = None,
            PlaceField::UpdatedAt => self.updated_at = None,
        }
    }

    /// Apply a partial update, returning the merged view
    ///
    /// Removals are applied after sets; validation guarantees they are
    /// disjoint, so the order is irrelevant for valid updates.
    pub fn merged(&self, update: &PlaceUpdate) -> Place {
        let mut place = self.clone();
        for value in &update.set {
            value.clone().apply(&mut place);
        }
        for field in &update.remove {
            place.clear(*field);
        }
        place
    }
}

// ============================================================================
// PlaceField / FieldValue
// ============================================================================

/// Name of a place attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceField {
    /// `id`
    Id,
    /// `name`
    Name,
    /// `asciiname`
    #[serde(rename = "asciiname")]
    AsciiName,
    /// `names`
    Names,
    /// `latitude`
    Latitude,
    /// `longitude`
    Longitude,
    /// `featureClass`
    FeatureClass,
    /// `featureCode`
    FeatureCode,
    /// `countryCode`
    CountryCode,
    /// `admin1Code`
    Admin1Code,
    /// `admin2Code`
    Admin2Code,
    /// `admin3Code`
    Admin3Code,
    /// `population`
    Population,
    /// `elevation`
    Elevation,
    /// `dem`
    Dem,
    /// `timezone`
    Timezone,
    /// `wikiId`
    WikiId,
    /// `updatedAt`
    UpdatedAt,
}

impl PlaceField {
    /// Every field, in declaration order
    pub const ALL: [PlaceField; 18] = [
        PlaceField::Id,
        PlaceField::Name,
        PlaceField::AsciiName,
        PlaceField::Names,
        PlaceField::Latitude,
        PlaceField::Longitude,
        PlaceField::FeatureClass,
        PlaceField::FeatureCode,
        PlaceField::CountryCode,
        PlaceField::Admin1Code,
        PlaceField::Admin2Code,
        PlaceField::Admin3Code,
        PlaceField::Population,
        PlaceField::Elevation,
        PlaceField::Dem,
        PlaceField::Timezone,
        PlaceField::WikiId,
        PlaceField::UpdatedAt,
    ];

    /// Stored attribute name
    pub const fn as_str(&self) -> &'static str {
        match self {
            PlaceField::Id => "id",
            PlaceField::Name => "name",
            PlaceField::AsciiName => "asciiname",
            PlaceField::Names => "names",
            PlaceField::Latitude => "latitude",
            PlaceField::Longitude => "longitude",
            PlaceField::FeatureClass => "featureClass",
            PlaceField::FeatureCode => "featureCode",
            PlaceField::CountryCode => "countryCode",
            PlaceField::Admin1Code => "admin1Code",
            PlaceField::Admin2Code => "admin2Code",
            PlaceField::Admin3Code => "admin3Code",
            PlaceField::Population => "population",
            PlaceField::Elevation => "elevation",
            PlaceField::Dem => "dem",
            PlaceField::Timezone => "timezone",
            PlaceField::WikiId => "wikiId",
            PlaceField::UpdatedAt => "updatedAt",
        }
    }

    /// Fields that must be present on every stored place
    pub const fn is_required(&self) -> bool {
        matches!(
            self,
            PlaceField::Id
                | PlaceField::Name
                | PlaceField::AsciiName
                | PlaceField::Latitude
                | PlaceField::Longitude
                | PlaceField::FeatureClass
                | PlaceField::FeatureCode
                | PlaceField::CountryCode
        )
    }

    /// Fields that feed secondary key derivation
    pub const fn affects_keys(&self) -> bool {
        matches!(
            self,
            PlaceField::CountryCode
                | PlaceField::Admin1Code
                | PlaceField::FeatureClass
                | PlaceField::FeatureCode
                | PlaceField::Population
        )
    }
}

impl fmt::Display for PlaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaceField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown place field '{}'", s))
    }
}

/// Typed value for a single place attribute, used in partial updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    /// `name`
    Name(String),
    /// `asciiname`
    #[serde(rename = "asciiname")]
    AsciiName(String),
    /// `names`
    Names(String),
    /// `latitude`
    Latitude(f64),
    /// `longitude`
    Longitude(f64),
    /// `featureClass`
    FeatureClass(FeatureClass),
    /// `featureCode`
    FeatureCode(String),
    /// `countryCode`
    CountryCode(String),
    /// `admin1Code`
    Admin1Code(String),
    /// `admin2Code`
    Admin2Code(String),
    /// `admin3Code`
    Admin3Code(String),
    /// `population`
    Population(u64),
    /// `elevation`
    Elevation(i32),
    /// `dem`
    Dem(i32),
    /// `timezone`
    Timezone(String),
    /// `wikiId`
    WikiId(String),
    /// `updatedAt`
    UpdatedAt(u64),
}

impl FieldValue {
    /// The field this value targets
    pub const fn field(&self) -> PlaceField {
        match self {
            FieldValue::Name(_) => PlaceField::Name,
            FieldValue::AsciiName(_) => PlaceField::AsciiName,
            FieldValue::Names(_) => PlaceField::Names,
            FieldValue::Latitude(_) => PlaceField::Latitude,
            FieldValue::Longitude(_) => PlaceField::Longitude,
            FieldValue::FeatureClass(_) => PlaceField::FeatureClass,
            FieldValue::FeatureCode(_) => PlaceField::FeatureCode,
            FieldValue::CountryCode(_) => PlaceField::CountryCode,
            FieldValue::Admin1Code(_) => PlaceField::Admin1Code,
            FieldValue::Admin2Code(_) => PlaceField::Admin2Code,
            FieldValue::Admin3Code(_) => PlaceField::Admin3Code,
            FieldValue::Population(_) => PlaceField::Population,
            FieldValue::Elevation(_) => PlaceField::Elevation,
            FieldValue::Dem(_) => PlaceField::Dem,
            FieldValue::Timezone(_) => PlaceField::Timezone,
            FieldValue::WikiId(_) => PlaceField::WikiId,
            FieldValue::UpdatedAt(_) => PlaceField::UpdatedAt,
        }
    }

    /// Write this value into a place
    pub fn apply(self, place: &mut Place) {
        match self {
            FieldValue::Name(v) => place.name = Some(v),
            FieldValue::AsciiName(v) => place.ascii_name = Some(v),
            FieldValue::Names(v) => place.names = Some(v),
            FieldValue::Latitude(v) => place.latitude = Some(v),
            FieldValue::Longitude(v) => place.longitude = Some(v),
            FieldValue::FeatureClass(v) => place.feature_class = Some(v),
            FieldValue::FeatureCode(v) => place.feature_code = Some(v),
            FieldValue::CountryCode(v) => place.country_code = Some(v),
            FieldValue::Admin1Code(v) => place.admin1_code = Some(v),
            FieldValue::Admin2Code(v) => place.admin2_code = Some(v),
            FieldValue::Admin3Code(v) => place.admin3_code = Some(v),
            FieldValue::Population(v) => place.population = Some(v),
            FieldValue::Elevation(v) => place.elevation = Some(v),
            FieldValue::Dem(v) => place.dem = Some(v),
            FieldValue::Timezone(v) => place.timezone = Some(v),
            FieldValue::WikiId(v) => place.wiki_id = Some(v),
            FieldValue::UpdatedAt(v) => place.updated_at = Some(v),
        }
    }
}

// ============================================================================
// PlaceUpdate
// ============================================================================

/// Partial update of a place: values to set and fields to remove
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceUpdate {
    /// Target place
    pub id: PlaceId,
    /// Values to write
    #[serde(default)]
    pub set: Vec<FieldValue>,
    /// Fields to remove; must be disjoint from `set`
    #[serde(default)]
    pub remove: Vec<PlaceField>,
}

impl PlaceUpdate {
    /// Start an empty update for a place
    pub fn new(id: impl Into<PlaceId>) -> Self {
        PlaceUpdate {
            id: id.into(),
            set: Vec::new(),
            remove: Vec::new(),
        }
    }

    /// Add a value to set
    pub fn set(mut self, value: FieldValue) -> Self {
        self.set.push(value);
        self
    }

    /// Add a field to remove
    pub fn remove(mut self, field: PlaceField) -> Self {
        self.remove.push(field);
        self
    }

    /// Whether the update has nothing to do
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }

    /// Whether any touched field feeds key derivation
    pub fn touches_keys(&self) -> bool {
        self.set.iter().any(|v| v.field().affects_keys())
            || self.remove.iter().any(|f| f.affects_keys())
    }
}

// ============================================================================
// FieldSet
// ============================================================================

/// Attribute projection applied by the primary store on reads
///
/// `id` is always populated because it is the entity identity; every other
/// field outside the set comes back empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSet(BTreeSet<PlaceField>);

impl FieldSet {
    /// Projection containing the given fields
    pub fn of(fields: impl IntoIterator<Item = PlaceField>) -> Self {
        FieldSet(fields.into_iter().collect())
    }

    /// Projection to the id alone
    pub fn id_only() -> Self {
        FieldSet::of([PlaceField::Id])
    }

    /// Whether the field is selected
    pub fn contains(&self, field: PlaceField) -> bool {
        self.0.contains(&field)
    }

    /// Iterate selected fields in order
    pub fn iter(&self) -> impl Iterator<Item = PlaceField> + '_ {
        self.0.iter().copied()
    }

    /// Number of selected fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of `place` restricted to the selected fields
    pub fn project(&self, place: &Place) -> Place {
        let mut projected = place.clone();
        for field in PlaceField::ALL {
            if !self.contains(field) {
                projected.clear(field);
            }
        }
        projected
    }
}

impl FromIterator<PlaceField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = PlaceField>>(iter: I) -> Self {
        FieldSet::of(iter)
    }
}

/// Apply an optional projection
pub fn project(place: Place, fields: Option<&FieldSet>) -> Place {
    match fields {
        Some(fields) => fields.project(&place),
        None => place,
    }
}

// ============================================================================
// OldPlaceId
// ============================================================================

/// Legacy id mapping row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OldPlaceId {
    /// Legacy identifier
    pub id: u64,
    /// Current geonames id
    #[serde(rename = "geonameid")]
    pub geoname_id: u64,
}
