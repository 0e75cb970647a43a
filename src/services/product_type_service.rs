use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, Result};
use crate::models::ProductType;
use crate::store::ProductTypeStore;

/// Use cases for the product type reference data.
#[derive(Clone)]
pub struct ProductTypeService {
    product_types: ProductTypeStore,
}

impl ProductTypeService {
    pub fn new(product_types: ProductTypeStore) -> Self {
        Self { product_types }
    }

    pub async fn create(&self, name: String, description: String) -> Result<ProductType> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Product type name is required".into()));
        }

        let product_type = ProductType::new(name, description);
        self.product_types.insert(&product_type).await?;
        Ok(product_type)
    }

    pub async fn update(&self, product_type: ProductType) -> Result<ProductType> {
        if product_type.name.trim().is_empty() {
            return Err(AppError::Validation("Product type name is required".into()));
        }

        self.product_types.update(&product_type).await?;
        Ok(product_type)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<()> {
        self.product_types.set_active(id, is_active).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.product_types.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ProductType>> {
        self.product_types.get_by_id(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<ProductType>> {
        self.product_types.get_by_name(name).await
    }

    pub async fn list(&self) -> Result<Vec<ProductType>> {
        self.product_types.all().await
    }

    pub async fn list_active(&self) -> Result<Vec<ProductType>> {
        self.product_types.active().await
    }

    pub fn watch_active(&self) -> UnboundedReceiver<Vec<ProductType>> {
        self.product_types.watch_active()
    }
}
