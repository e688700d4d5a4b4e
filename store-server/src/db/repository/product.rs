//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = parse_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Distinct brand names
    pub async fn distinct_brands(&self) -> RepoResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct BrandRow {
            brand: String,
        }

        let rows: Vec<BrandRow> = self
            .base
            .db()
            .query("SELECT brand FROM product GROUP BY brand")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.brand).collect())
    }

    /// Find products of one brand
    pub async fn find_by_brand(&self, brand: &str) -> RepoResult<Vec<Product>> {
        let brand_owned = brand.to_string();
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE brand = $brand ORDER BY name")
            .bind(("brand", brand_owned))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = chrono::Utc::now().timestamp_millis();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            image: data.image.unwrap_or_default(),
            price: data.price,
            quantity: data.quantity.unwrap_or(0),
            brand: data.brand,
            discount_percentage: data.discount_percentage.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (partial), returns the updated record
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id = parse_id(PRODUCT_TABLE, id)?;

        if data.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.price.is_some() { set_parts.push("price = $price"); }
        if data.brand.is_some() { set_parts.push("brand = $brand"); }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.image.is_some() { set_parts.push("image = $image"); }
        if data.quantity.is_some() { set_parts.push("quantity = $quantity"); }
        if data.discount_percentage.is_some() {
            set_parts.push("discount_percentage = $discount_percentage");
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("thing", record_id))
            .bind(("updated_at", chrono::Utc::now().timestamp_millis()));

        if let Some(v) = data.name { query = query.bind(("name", v)); }
        if let Some(v) = data.price { query = query.bind(("price", v)); }
        if let Some(v) = data.brand { query = query.bind(("brand", v)); }
        if let Some(v) = data.description { query = query.bind(("description", v)); }
        if let Some(v) = data.image { query = query.bind(("image", v)); }
        if let Some(v) = data.quantity { query = query.bind(("quantity", v)); }
        if let Some(v) = data.discount_percentage { query = query.bind(("discount_percentage", v)); }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<Product> {
        let record_id = parse_id(PRODUCT_TABLE, id)?;
        let deleted: Option<Product> = self.base.db().delete(record_id).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
