//! Product state container
//!
//! Catalog mutations absorb a missing endpoint with a local write.
//! Recording a sale does not: it adjusts sold-unit counters the backend
//! owns, and a phantom confirmation there would misstate revenue.

use std::sync::Arc;

use parking_lot::RwLock;
use pavilion_domain::{Product, ProductDraft, ProductPatch, RequestDescriptor, Result};
use serde_json::json;

use super::{decode, to_payload};
use crate::fallback::{absorb_not_found, FallbackPolicy, WriteOutcome};
use crate::ports::Gateway;

/// Local state container for products
pub struct ProductStore {
    gateway: Arc<dyn Gateway>,
    fallback: FallbackPolicy,
    products: RwLock<Vec<Product>>,
}

impl ProductStore {
    /// Create an empty store.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, fallback: FallbackPolicy::new(), products: RwLock::new(Vec::new()) }
    }

    /// Snapshot of the local state.
    pub fn products(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    /// Reload the full collection from the backend.
    pub async fn refresh(&self) -> Result<Vec<Product>> {
        let response = self.gateway.send(RequestDescriptor::get("/products")).await?;
        let products: Vec<Product> = decode(response.body())?;
        *self.products.write() = products.clone();
        Ok(products)
    }

    /// Fetch a single product and fold it into local state.
    pub async fn get(&self, id: &str) -> Result<Product> {
        let response = self.gateway.send(RequestDescriptor::get(format!("/products/{id}"))).await?;
        let product: Product = decode(response.body())?;
        self.replace_local(product.clone());
        Ok(product)
    }

    /// Create a product; absorbs a missing endpoint with a local write.
    pub async fn create(&self, draft: &ProductDraft) -> Result<WriteOutcome<Product>> {
        let payload = to_payload(draft)?;
        let result = self
            .gateway
            .send(RequestDescriptor::post("/products").json(payload))
            .await
            .and_then(|response| decode::<Product>(response.body()));

        let outcome = absorb_not_found(result, || Product {
            id: self.fallback.synthesize_id("product"),
            brand_id: draft.brand_id.clone(),
            name: draft.name.clone(),
            price: draft.price,
            units_sold: 0,
        })?;

        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Update a product; absorbs a missing endpoint with a local write.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> Result<WriteOutcome<Product>> {
        let payload = to_payload(patch)?;
        let result = self
            .gateway
            .send(RequestDescriptor::put(format!("/products/{id}")).json(payload))
            .await
            .and_then(|response| decode::<Product>(response.body()));

        let outcome = absorb_not_found(result, || self.patched_local(id, patch))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Delete a product; absorbs a missing endpoint with a local removal.
    pub async fn delete(&self, id: &str) -> Result<WriteOutcome<()>> {
        let result = self
            .gateway
            .send(RequestDescriptor::delete(format!("/products/{id}")))
            .await
            .map(|_| ());

        let outcome = absorb_not_found(result, || ())?;
        self.products.write().retain(|product| product.id != id);
        Ok(outcome)
    }

    /// Record a sale of `quantity` units. Never absorbed: sold-unit counters
    /// must come from the backend or not at all.
    pub async fn record_sale(&self, id: &str, quantity: u64) -> Result<Product> {
        let response = self
            .gateway
            .send(
                RequestDescriptor::patch(format!("/products/{id}/record-sale"))
                    .json(json!({ "quantity": quantity })),
            )
            .await?;
        let product: Product = decode(response.body())?;
        self.replace_local(product.clone());
        Ok(product)
    }

    fn replace_local(&self, product: Product) {
        let mut products = self.products.write();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => products.push(product),
        }
    }

    fn patched_local(&self, id: &str, patch: &ProductPatch) -> Product {
        let mut product = self.local_or_placeholder(id);
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        product
    }

    fn local_or_placeholder(&self, id: &str) -> Product {
        self.products.read().iter().find(|p| p.id == id).cloned().unwrap_or_else(|| Product {
            id: self.fallback.synthesize_id("product"),
            brand_id: String::new(),
            name: String::new(),
            price: 0.0,
            units_sold: 0,
        })
    }
}
