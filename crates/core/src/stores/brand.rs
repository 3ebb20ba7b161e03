//! Brand state container

use std::sync::Arc;

use parking_lot::RwLock;
use pavilion_domain::{
    Brand, BrandDraft, BrandPatch, MultipartField, MultipartPart, RequestDescriptor, Result,
};

use super::{decode, to_payload};
use crate::fallback::{absorb_not_found, FallbackPolicy, WriteOutcome};
use crate::ports::Gateway;

/// Local state container for brands
pub struct BrandStore {
    gateway: Arc<dyn Gateway>,
    fallback: FallbackPolicy,
    brands: RwLock<Vec<Brand>>,
}

impl BrandStore {
    /// Create an empty store.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, fallback: FallbackPolicy::new(), brands: RwLock::new(Vec::new()) }
    }

    /// Snapshot of the local state.
    pub fn brands(&self) -> Vec<Brand> {
        self.brands.read().clone()
    }

    /// Reload the full collection from the backend.
    pub async fn refresh(&self) -> Result<Vec<Brand>> {
        let response = self.gateway.send(RequestDescriptor::get("/brand")).await?;
        let brands: Vec<Brand> = decode(response.body())?;
        *self.brands.write() = brands.clone();
        Ok(brands)
    }

    /// Brands owned by one account. Does not replace the local collection.
    pub async fn by_owner(&self, owner_id: &str) -> Result<Vec<Brand>> {
        let response =
            self.gateway.send(RequestDescriptor::get(format!("/brand/owner/{owner_id}"))).await?;
        decode(response.body())
    }

    /// Fetch one brand and update it in the local state.
    pub async fn get(&self, id: &str) -> Result<Brand> {
        let response = self.gateway.send(RequestDescriptor::get(format!("/brand/{id}"))).await?;
        let brand: Brand = decode(response.body())?;
        self.replace_local(brand.clone());
        Ok(brand)
    }

    /// Create a brand; absorbs a missing endpoint with a local write.
    pub async fn create(&self, draft: &BrandDraft) -> Result<WriteOutcome<Brand>> {
        let payload = to_payload(draft)?;
        let result = self
            .gateway
            .send(RequestDescriptor::post("/brand").json(payload))
            .await
            .and_then(|response| decode::<Brand>(response.body()));

        let outcome = absorb_not_found(result, || Brand {
            id: self.fallback.synthesize_id("brand"),
            name: draft.name.clone(),
            owner_id: draft.owner_id.clone(),
            logo_url: None,
            active: true,
        })?;

        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Update a brand; absorbs a missing endpoint with a local write.
    pub async fn update(&self, id: &str, patch: &BrandPatch) -> Result<WriteOutcome<Brand>> {
        let payload = to_payload(patch)?;
        let result = self
            .gateway
            .send(RequestDescriptor::put(format!("/brand/{id}")).json(payload))
            .await
            .and_then(|response| decode::<Brand>(response.body()));

        let outcome = absorb_not_found(result, || self.patched_local(id, patch))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Delete a brand; absorbs a missing endpoint with a local removal.
    pub async fn delete(&self, id: &str) -> Result<WriteOutcome<()>> {
        let result = self
            .gateway
            .send(RequestDescriptor::delete(format!("/brand/{id}")))
            .await
            .map(|_| ());

        let outcome = absorb_not_found(result, || ())?;
        self.brands.write().retain(|brand| brand.id != id);
        Ok(outcome)
    }

    /// Flip the active flag; absorbs a missing endpoint with a local flip.
    pub async fn toggle_status(&self, id: &str) -> Result<WriteOutcome<Brand>> {
        let result = self
            .gateway
            .send(RequestDescriptor::patch(format!("/brand/{id}/toggle-status")))
            .await
            .and_then(|response| decode::<Brand>(response.body()));

        let outcome = absorb_not_found(result, || self.toggled_local(id))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Upload a brand logo as a multipart form.
    ///
    /// Never falls back: a synthesized logo URL would point nowhere.
    pub async fn upload_logo(
        &self,
        id: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Brand> {
        let field = MultipartField {
            name: "logo".into(),
            part: MultipartPart::File {
                filename: filename.into(),
                content_type: content_type.into(),
                data,
            },
        };
        let descriptor =
            RequestDescriptor::post(format!("/brand/{id}/logo")).multipart(vec![field]);

        let response = self.gateway.send(descriptor).await?;
        let brand: Brand = decode(response.body())?;
        self.replace_local(brand.clone());
        Ok(brand)
    }

    fn replace_local(&self, brand: Brand) {
        let mut brands = self.brands.write();
        match brands.iter_mut().find(|b| b.id == brand.id) {
            Some(slot) => *slot = brand,
            None => brands.push(brand),
        }
    }

    fn patched_local(&self, id: &str, patch: &BrandPatch) -> Brand {
        let mut brand = self.local_or_placeholder(id);
        if let Some(name) = &patch.name {
            brand.name = name.clone();
        }
        brand
    }

    fn toggled_local(&self, id: &str) -> Brand {
        let mut brand = self.local_or_placeholder(id);
        brand.active = !brand.active;
        brand
    }

    fn local_or_placeholder(&self, id: &str) -> Brand {
        self.brands.read().iter().find(|b| b.id == id).cloned().unwrap_or_else(|| Brand {
            id: self.fallback.synthesize_id("brand"),
            name: String::new(),
            owner_id: String::new(),
            logo_url: None,
            active: true,
        })
    }
}
