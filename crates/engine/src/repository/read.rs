//! Read paths
//!
//! Index-backed reads resolve ids through a secondary index and then fetch
//! the entities from the primary store in caller order. Free-text search
//! does the same with ids from the search index, so returned entities
//! always reflect the primary store and never the search projection.

use tracing::debug;

use geoplaces_core::keys::{format_key_admin1, format_key_in_admin1, format_key_main};
use geoplaces_core::limits::{validate_country_param, validate_limit_param, validate_text_param};
use geoplaces_core::{
    FieldSet, IndexName, IndexQuery, OldPlaceId, Place, PlaceId, PlaceResult, RangeKey,
    RangeMatch, SearchQuery,
};

use super::sync::validate_id;
use super::PlaceRepository;
use crate::ordering::{dedup_ids, sort_by_ids};

impl PlaceRepository {
    /// Fetch one place
    pub async fn get_by_id(
        &self,
        id: impl Into<PlaceId>,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Option<Place>> {
        let id = id.into();
        validate_id(id)?;
        self.store.get(id, fields).await
    }

    /// Fetch many places in the order of `ids`
    ///
    /// Missing ids are skipped and repeated ids collapse to their first
    /// occurrence. Fetches go out in chunks of `batch_get_size`.
    pub async fn get_by_ids(
        &self,
        ids: &[PlaceId],
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        for id in ids {
            validate_id(*id)?;
        }
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut places = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(self.config.batch_get_size.max(1)) {
            places.extend(self.store.batch_get(chunk, fields).await?);
        }
        Ok(sort_by_ids(&ids, places))
    }

    /// Whether a place exists
    pub async fn exists(&self, id: impl Into<PlaceId>) -> PlaceResult<bool> {
        let id = id.into();
        validate_id(id)?;
        Ok(self
            .store
            .get(id, Some(&FieldSet::id_only()))
            .await?
            .is_some())
    }

    /// First-order administrative areas of a country, by admin1 code descending
    pub async fn get_admin1s(
        &self,
        country: &str,
        limit: usize,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        validate_country_param("country", country)?;
        validate_limit_param("limit", limit)?;

        let query = IndexQuery::new(IndexName::Admin1, format_key_admin1(country), limit);
        let ids = self.executor.execute(self.store.as_ref(), &query).await?;
        self.get_by_ids(&ids, fields).await
    }

    /// One first-order administrative area by country and admin1 code
    pub async fn get_admin1(
        &self,
        country: &str,
        admin1_code: &str,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Option<Place>> {
        validate_country_param("country", country)?;
        validate_text_param("admin1_code", admin1_code)?;

        let query = IndexQuery::new(IndexName::Admin1, format_key_admin1(country), 1).with_range(
            RangeMatch::Eq(RangeKey::Text(admin1_code.trim().to_string())),
        );
        let page = self.store.query_index(&query).await?;
        match page.items.first() {
            Some(entry) => self.store.get(entry.id, fields).await,
            None => Ok(None),
        }
    }

    /// Places inside an admin1 area, by population descending
    pub async fn get_places_in_admin1(
        &self,
        country: &str,
        admin1_code: &str,
        limit: usize,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        validate_country_param("country", country)?;
        validate_text_param("admin1_code", admin1_code)?;
        validate_limit_param("limit", limit)?;

        let query = IndexQuery::new(
            IndexName::InAdmin1,
            format_key_in_admin1(country, admin1_code),
            limit,
        );
        let ids = self.executor.execute(self.store.as_ref(), &query).await?;
        debug!(partition = %query.partition_key, found = ids.len(), "Places in admin1 resolved");
        self.get_by_ids(&ids, fields).await
    }

    /// Main places of a country, by population descending
    pub async fn get_main_places(
        &self,
        country: &str,
        limit: usize,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        validate_country_param("country", country)?;
        validate_limit_param("limit", limit)?;

        let query = IndexQuery::new(IndexName::MainPlaces, format_key_main(country), limit);
        let ids = self.executor.execute(self.store.as_ref(), &query).await?;
        self.get_by_ids(&ids, fields).await
    }

    /// Free-text search, returning current primary-store entities
    pub async fn search(
        &self,
        query: &SearchQuery,
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        validate_text_param("query", &query.query)?;
        validate_limit_param("limit", query.limit)?;
        if let Some(country) = &query.country {
            validate_country_param("country", country)?;
        }

        let ids = self.search_call(self.search.search(query)).await?;
        debug!(query = %query.query, hits = ids.len(), "Search ids resolved");
        self.get_by_ids(&ids, fields).await
    }

    /// Current geonames id for a legacy id
    pub async fn get_old_place_id(&self, id: impl Into<PlaceId>) -> PlaceResult<Option<OldPlaceId>> {
        let id = id.into();
        validate_id(id)?;
        self.old_ids.get(id).await
    }
}
