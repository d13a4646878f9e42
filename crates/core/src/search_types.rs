//! Search index document and query types
//!
//! The search document is a disposable projection of a `Place`: identity,
//! country, the searchable names and their diacritic-stripped ("atonic")
//! forms. It is rebuilt from the primary store on every write and never
//! read back as an entity.

use crate::types::{Place, PlaceId};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// SearchDocument
// ============================================================================

/// Searchable projection of a place
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    /// Place id
    pub id: PlaceId,
    /// Country code as stored on the place
    pub country_code: String,
    /// Display name
    pub name: String,
    /// ASCII name
    #[serde(rename = "asciiname")]
    pub ascii_name: String,
    /// Distinct name variants other than `name` and `asciiname`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Admin1 code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1_code: Option<String>,
    /// Distinct diacritic-stripped forms not already present verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atonic: Vec<String>,
}

impl SearchDocument {
    /// Build the search document for a place
    ///
    /// Missing names project to empty strings; the repository only builds
    /// documents from fully stored places.
    pub fn from_place(place: &Place) -> Self {
        let name = place.name.clone().unwrap_or_default();
        let ascii_name = place.ascii_name.clone().unwrap_or_default();

        let mut names: Vec<String> = Vec::new();
        if let Some(raw) = place.names.as_deref() {
            for variant in parse_names(raw) {
                if variant != name && variant != ascii_name && !names.contains(&variant) {
                    names.push(variant);
                }
            }
        }

        let mut atonic_forms: Vec<String> = Vec::new();
        for source in std::iter::once(&name).chain(names.iter()) {
            let form = atonic(source);
            if form.is_empty()
                || form == name
                || form == ascii_name
                || names.contains(&form)
                || atonic_forms.contains(&form)
            {
                continue;
            }
            atonic_forms.push(form);
        }

        SearchDocument {
            id: place.id,
            country_code: place.country_code.clone().unwrap_or_default(),
            name,
            ascii_name,
            names,
            admin1_code: place.admin1_code.clone().filter(|c| !c.trim().is_empty()),
            atonic: atonic_forms,
        }
    }

    /// Every searchable text value, tagged with its field
    pub fn fields(&self) -> Vec<(SearchField, &str)> {
        let mut fields = vec![
            (SearchField::Name, self.name.as_str()),
            (SearchField::AsciiName, self.ascii_name.as_str()),
        ];
        fields.extend(self.names.iter().map(|n| (SearchField::Names, n.as_str())));
        fields.extend(self.atonic.iter().map(|n| (SearchField::Atonic, n.as_str())));
        fields
    }
}

/// Searchable field of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchField {
    /// `name`
    Name,
    /// `asciiname`
    AsciiName,
    /// `names`
    Names,
    /// `atonic`
    Atonic,
}

/// Split a pipe-delimited names list into trimmed variants
///
/// Entries may carry a bracketed language suffix (`Iași[ro]`), which is
/// dropped. Blank entries are skipped; duplicates are kept in order.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|entry| {
            let entry = entry.trim();
            match (entry.ends_with(']'), entry.rfind('[')) {
                (true, Some(open)) => entry[..open].trim(),
                _ => entry,
            }
        })
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Strip diacritics: canonical decomposition with combining marks removed
pub fn atonic(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

// ============================================================================
// SearchQuery
// ============================================================================

/// How query text is matched against document fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Any query term in any field
    #[default]
    BestFields,
    /// Query terms as a consecutive run within one field value, last term as prefix
    PhrasePrefix,
}

/// Free-text search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text
    pub query: String,
    /// Optional country filter
    #[serde(default)]
    pub country: Option<String>,
    /// Match strategy
    #[serde(default)]
    pub match_type: MatchType,
    /// Maximum ids to return
    pub limit: usize,
}

impl SearchQuery {
    /// Best-fields query without country filter
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        SearchQuery {
            query: query.into(),
            country: None,
            match_type: MatchType::BestFields,
            limit,
        }
    }

    /// Restrict to a country
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Choose the match strategy
    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }
}
