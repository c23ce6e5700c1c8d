use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::types::{CatalogError, CreatePackageRequest, Package, PackageFilters, UpdatePackageRequest};

const PACKAGE_COLUMNS: &str = "id, title, slug, hero_image, gallery, region, duration_days, \
     price_from, rating, tags, summary, inclusions, exclusions, itinerary, is_featured, \
     created_at, updated_at";

fn package_from_row(row: &PgRow) -> Package {
    Package {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        hero_image: row.get("hero_image"),
        gallery: row.get("gallery"),
        region: row.get("region"),
        duration_days: row.get("duration_days"),
        price_from: row.get("price_from"),
        rating: row.get("rating"),
        tags: row.get("tags"),
        summary: row.get("summary"),
        inclusions: row.get("inclusions"),
        exclusions: row.get("exclusions"),
        itinerary: row.get("itinerary"),
        is_featured: row.get("is_featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Service for package catalog operations.
pub struct PackageService {
    pool: PgPool,
}

impl PackageService {
    /// Creates a new instance of `PackageService` with the provided database
    /// connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new package. The slug is the package's public identity and
    /// must be unique.
    pub async fn create_package(
        &self,
        request: &CreatePackageRequest,
    ) -> Result<Package, CatalogError> {
        let existing = sqlx::query("SELECT id FROM packages WHERE slug = $1")
            .bind(&request.slug)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(CatalogError::SlugExists);
        }

        let itinerary = serde_json::to_value(&request.itinerary)
            .map_err(|e| CatalogError::Validation(format!("Invalid itinerary: {}", e)))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO packages (
                title, slug, hero_image, region, duration_days, price_from,
                summary, tags, inclusions, exclusions, itinerary
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PACKAGE_COLUMNS}
            "#,
        ))
        .bind(request.title.trim())
        .bind(request.slug.trim())
        .bind(
            request
                .hero_image
                .clone()
                .unwrap_or_else(|| "/images/placeholder.svg".to_string()),
        )
        .bind(&request.region)
        .bind(request.duration_days)
        .bind(request.price_from)
        .bind(&request.summary)
        .bind(&request.tags)
        .bind(&request.inclusions)
        .bind(&request.exclusions)
        .bind(&itinerary)
        .fetch_one(&self.pool)
        .await?;

        Ok(package_from_row(&row))
    }

    /// Partially updates a package; omitted fields keep their stored value.
    pub async fn update_package(
        &self,
        package_id: &Uuid,
        request: &UpdatePackageRequest,
    ) -> Result<Package, CatalogError> {
        // A slug change must not collide with another package.
        if let Some(slug) = &request.slug {
            let taken = sqlx::query("SELECT id FROM packages WHERE slug = $1 AND id <> $2")
                .bind(slug)
                .bind(package_id)
                .fetch_optional(&self.pool)
                .await?;

            if taken.is_some() {
                return Err(CatalogError::SlugExists);
            }
        }

        let itinerary = match &request.itinerary {
            Some(days) => Some(
                serde_json::to_value(days)
                    .map_err(|e| CatalogError::Validation(format!("Invalid itinerary: {}", e)))?,
            ),
            None => None,
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE packages SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                region = COALESCE($4, region),
                duration_days = COALESCE($5, duration_days),
                price_from = COALESCE($6, price_from),
                summary = COALESCE($7, summary),
                hero_image = COALESCE($8, hero_image),
                tags = COALESCE($9, tags),
                inclusions = COALESCE($10, inclusions),
                exclusions = COALESCE($11, exclusions),
                gallery = COALESCE($12, gallery),
                itinerary = COALESCE($13, itinerary),
                is_featured = COALESCE($14, is_featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PACKAGE_COLUMNS}
            "#,
        ))
        .bind(package_id)
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.region)
        .bind(request.duration_days)
        .bind(request.price_from)
        .bind(&request.summary)
        .bind(&request.hero_image)
        .bind(&request.tags)
        .bind(&request.inclusions)
        .bind(&request.exclusions)
        .bind(&request.gallery)
        .bind(&itinerary)
        .bind(request.is_featured)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(package_from_row(&row)),
            None => Err(CatalogError::NotFound),
        }
    }

    /// Deletes a package.
    pub async fn delete_package(&self, package_id: &Uuid) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(package_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        Ok(())
    }

    /// Lists all packages, newest first. Staff console view.
    pub async fn list_packages(&self) -> Result<Vec<Package>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(package_from_row).collect())
    }

    /// Public package listing with optional region/duration/price filters.
    pub async fn find_packages(
        &self,
        filters: &PackageFilters,
    ) -> Result<Vec<Package>, CatalogError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PACKAGE_COLUMNS} FROM packages
            WHERE ($1::TEXT IS NULL OR region = $1)
              AND ($2::INT IS NULL OR duration_days >= $2)
              AND ($3::BIGINT IS NULL OR price_from <= $3)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(&filters.region)
        .bind(filters.duration)
        .bind(filters.max_price)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(package_from_row).collect())
    }

    /// Featured packages for the home page, capped at `limit`.
    pub async fn featured_packages(&self, limit: i64) -> Result<Vec<Package>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE is_featured ORDER BY created_at DESC LIMIT $1",
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(package_from_row).collect())
    }

    /// Looks up a package by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Package>, CatalogError> {
        let row = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE slug = $1",
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(package_from_row))
    }
}
