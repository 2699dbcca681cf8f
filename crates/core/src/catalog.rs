//! Insertion-ordered catalogs of stores and partners.
//!
//! Enumeration order is the order in which profiles were first inserted and
//! is preserved across upserts, so score ties resolve the same way on every
//! call.

use crate::domain::partner::{Partner, PartnerId};
use crate::domain::store::{StoreId, StoreProfile};
use crate::domain::taxonomy::CommerceStage;

#[derive(Clone, Debug, Default)]
pub struct StoreCatalog {
    stores: Vec<StoreProfile>,
}

impl StoreCatalog {
    pub fn new(stores: Vec<StoreProfile>) -> Self {
        let mut catalog = Self::default();
        for store in stores {
            catalog.upsert(store);
        }
        catalog
    }

    pub fn find(&self, store_id: &StoreId) -> Option<&StoreProfile> {
        self.stores.iter().find(|store| &store.id == store_id)
    }

    pub fn find_mut(&mut self, store_id: &StoreId) -> Option<&mut StoreProfile> {
        self.stores.iter_mut().find(|store| &store.id == store_id)
    }

    /// Inserts a new store at the end or replaces an existing one in place.
    /// Returns the replaced profile, if any.
    pub fn upsert(&mut self, store: StoreProfile) -> Option<StoreProfile> {
        match self.find_mut(&store.id) {
            Some(existing) => Some(std::mem::replace(existing, store)),
            None => {
                self.stores.push(store);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoreProfile> {
        self.stores.iter()
    }

    pub fn as_slice(&self) -> &[StoreProfile] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PartnerCatalog {
    partners: Vec<Partner>,
}

impl PartnerCatalog {
    pub fn new(partners: Vec<Partner>) -> Self {
        let mut catalog = Self::default();
        for partner in partners {
            catalog.upsert(partner);
        }
        catalog
    }

    pub fn find(&self, partner_id: &PartnerId) -> Option<&Partner> {
        self.partners.iter().find(|partner| &partner.id == partner_id)
    }

    pub fn upsert(&mut self, partner: Partner) -> Option<Partner> {
        match self.partners.iter_mut().find(|existing| existing.id == partner.id) {
            Some(existing) => Some(std::mem::replace(existing, partner)),
            None => {
                self.partners.push(partner);
                None
            }
        }
    }

    pub fn by_category(&self, stage: CommerceStage) -> impl Iterator<Item = &Partner> {
        self.partners.iter().filter(move |partner| partner.category == stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partner> {
        self.partners.iter()
    }

    pub fn as_slice(&self) -> &[Partner] {
        &self.partners
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}
