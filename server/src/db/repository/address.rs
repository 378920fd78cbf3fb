//! Address Repository
//!
//! Lookups are ownership-checked: a missing address and someone else's
//! address are indistinguishable to the caller, so address ids cannot be
//! probed for existence.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::utils::time::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ADDRESS_TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_owner(&self, owner: &RecordId) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner.to_string()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    /// Load an address only if it belongs to `owner`; NotFound otherwise
    pub async fn find_owned(&self, id: &str, owner: &RecordId) -> RepoResult<Address> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        let address: Option<Address> = self.base.db().select(rid).await?;
        match address {
            Some(addr) if addr.owner == *owner => Ok(addr),
            _ => Err(RepoError::NotFound(format!("Address {} not found", id))),
        }
    }

    pub async fn create(&self, owner: RecordId, data: AddressCreate) -> RepoResult<Address> {
        let address = Address {
            id: None,
            owner,
            full_name: data.full_name,
            phone: data.phone,
            line1: data.line1,
            line2: data.line2,
            city: data.city,
            postal_code: data.postal_code,
            country: data.country,
            created_at: now_millis(),
        };
        let created: Option<Address> = self
            .base
            .db()
            .create(ADDRESS_TABLE)
            .content(address)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }

    pub async fn update(
        &self,
        id: &str,
        owner: &RecordId,
        data: AddressUpdate,
    ) -> RepoResult<Address> {
        // Ownership check before any write
        let existing = self.find_owned(id, owner).await?;
        let rid = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Loaded address without id".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.full_name.is_some() {
            set_parts.push("full_name = $full_name");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }
        if data.line1.is_some() {
            set_parts.push("line1 = $line1");
        }
        if data.line2.is_some() {
            set_parts.push("line2 = $line2");
        }
        if data.city.is_some() {
            set_parts.push("city = $city");
        }
        if data.postal_code.is_some() {
            set_parts.push("postal_code = $postal_code");
        }
        if data.country.is_some() {
            set_parts.push("country = $country");
        }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("rid", rid));
        if let Some(v) = data.full_name {
            query = query.bind(("full_name", v));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.line1 {
            query = query.bind(("line1", v));
        }
        if let Some(v) = data.line2 {
            query = query.bind(("line2", v));
        }
        if let Some(v) = data.city {
            query = query.bind(("city", v));
        }
        if let Some(v) = data.postal_code {
            query = query.bind(("postal_code", v));
        }
        if let Some(v) = data.country {
            query = query.bind(("country", v));
        }

        let mut result = query.await?;
        let addresses: Vec<Address> = result.take(0)?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }

    pub async fn delete(&self, id: &str, owner: &RecordId) -> RepoResult<()> {
        let existing = self.find_owned(id, owner).await?;
        let rid = existing
            .id
            .ok_or_else(|| RepoError::Database("Loaded address without id".to_string()))?;
        let _: Option<Address> = self.base.db().delete(rid).await?;
        Ok(())
    }
}
