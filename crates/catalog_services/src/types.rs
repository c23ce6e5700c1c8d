use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One day of a package itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    /// Day number within the trip, starting at 1.
    pub day: i32,
    /// Short title for the day.
    pub title: String,
    /// Longer description of the day's plan.
    pub description: String,
    /// Highlight bullet points.
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// A sellable travel package as stored in the database.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Package {
    /// Unique identifier for the package.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// URL-safe identity, unique across packages.
    pub slug: String,
    /// Hero image path.
    pub hero_image: String,
    /// Gallery image paths.
    pub gallery: Vec<String>,
    /// Region the package covers.
    pub region: String,
    /// Trip length in days.
    pub duration_days: i32,
    /// Starting price per traveller.
    pub price_from: i64,
    /// Display rating.
    pub rating: f64,
    /// Free-form tags for filtering.
    pub tags: Vec<String>,
    /// Marketing summary.
    pub summary: String,
    /// What the price includes.
    pub inclusions: Vec<String>,
    /// What the price excludes.
    pub exclusions: Vec<String>,
    /// Ordered day-by-day itinerary, stored as JSON.
    pub itinerary: serde_json::Value,
    /// Whether the package is featured on the home page.
    pub is_featured: bool,
    /// Timestamp when the package was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the package was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Package {
    /// Converts the stored itinerary JSON into a structured day list.
    pub fn to_itinerary(&self) -> Result<Vec<DayPlan>, CatalogError> {
        serde_json::from_value(self.itinerary.clone())
            .map_err(|e| CatalogError::Validation(format!("Invalid itinerary in database: {}", e)))
    }
}

/// Request structure for creating a package.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackageRequest {
    /// Display title.
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// URL-safe identity, unique across packages.
    #[validate(length(min = 3, message = "Slug must be at least 3 characters"))]
    pub slug: String,

    /// Region the package covers.
    #[validate(length(min = 1, message = "Region is required"))]
    pub region: String,

    /// Trip length in days.
    #[validate(range(min = 1, message = "Duration must be at least 1 day"))]
    pub duration_days: i32,

    /// Starting price per traveller.
    #[validate(range(min = 1000, message = "Price must be at least 1000"))]
    pub price_from: i64,

    /// Marketing summary.
    #[validate(length(min = 20, message = "Summary must be at least 20 characters"))]
    pub summary: String,

    /// Hero image path; a placeholder is used when omitted.
    pub hero_image: Option<String>,

    /// Free-form tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// What the price includes.
    #[serde(default)]
    pub inclusions: Vec<String>,

    /// What the price excludes.
    #[serde(default)]
    pub exclusions: Vec<String>,

    /// Ordered day-by-day itinerary.
    #[serde(default)]
    pub itinerary: Vec<DayPlan>,
}

/// Request structure for partially updating a package.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePackageRequest {
    /// New title, if changing.
    pub title: Option<String>,
    /// New slug, if changing.
    pub slug: Option<String>,
    /// New region, if changing.
    pub region: Option<String>,
    /// New duration, if changing.
    pub duration_days: Option<i32>,
    /// New starting price, if changing.
    pub price_from: Option<i64>,
    /// New summary, if changing.
    pub summary: Option<String>,
    /// New hero image path, if changing.
    pub hero_image: Option<String>,
    /// New tag list, if changing.
    pub tags: Option<Vec<String>>,
    /// New inclusions, if changing.
    pub inclusions: Option<Vec<String>>,
    /// New exclusions, if changing.
    pub exclusions: Option<Vec<String>>,
    /// New gallery, if changing.
    pub gallery: Option<Vec<String>>,
    /// New itinerary, if changing.
    pub itinerary: Option<Vec<DayPlan>>,
    /// New featured flag, if changing.
    pub is_featured: Option<bool>,
}

/// Public query filters for the package list.
#[derive(Debug, Default, Deserialize)]
pub struct PackageFilters {
    /// Exact region match.
    pub region: Option<String>,
    /// Minimum trip length in days.
    pub duration: Option<i32>,
    /// Maximum starting price.
    pub max_price: Option<i64>,
}

/// An unconverted lead, optionally tied to a package.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Inquiry {
    /// Unique identifier for the inquiry.
    pub id: Uuid,
    /// Customer account that submitted the inquiry, if authenticated.
    pub customer_id: Option<Uuid>,
    /// Package the inquiry is about, if any.
    pub package_id: Option<Uuid>,
    /// Title snapshot of the package, if any.
    pub package_title: Option<String>,
    /// Name of the lead.
    pub full_name: String,
    /// E-mail of the lead.
    pub email: String,
    /// Phone of the lead.
    pub phone: Option<String>,
    /// Free-text message.
    pub message: String,
    /// Lead status (`new`, `contacted` or `converted`).
    pub status: String,
    /// Timestamp when the inquiry was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the inquiry was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Request structure for submitting an inquiry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInquiryRequest {
    /// Name of the lead.
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub full_name: String,

    /// E-mail of the lead.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Phone of the lead.
    pub phone: Option<String>,

    /// Free-text message.
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,

    /// Package the inquiry is about, if any.
    pub package_id: Option<Uuid>,

    /// Title of that package, if any.
    pub package_title: Option<String>,
}

/// Request structure for updating an inquiry's status.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInquiryStatusRequest {
    /// New lead status.
    #[validate(custom(function = "validate_inquiry_status"))]
    pub status: String,
}

/// Custom error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Package or inquiry not found.
    #[error("Not found")]
    NotFound,

    /// A package with the requested slug already exists.
    #[error("Slug already in use")]
    SlugExists,
}

impl actix_web::ResponseError for CatalogError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            CatalogError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            CatalogError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": "Package not found"
            })),
            CatalogError::SlugExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "slug_exists",
                "message": "A package with this slug already exists"
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

/// Custom validation function for inquiry status.
fn validate_inquiry_status(status: &str) -> Result<(), validator::ValidationError> {
    match status {
        "new" | "contacted" | "converted" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_inquiry_status")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_status_accepts_only_known_values() {
        assert!(validate_inquiry_status("new").is_ok());
        assert!(validate_inquiry_status("contacted").is_ok());
        assert!(validate_inquiry_status("converted").is_ok());
        assert!(validate_inquiry_status("closed").is_err());
    }

    #[test]
    fn itinerary_json_converts_to_day_plans() {
        let pkg = Package {
            id: Uuid::new_v4(),
            title: "Kerala Backwaters".to_string(),
            slug: "kerala-backwaters".to_string(),
            hero_image: "/images/placeholder.svg".to_string(),
            gallery: vec![],
            region: "Kerala".to_string(),
            duration_days: 6,
            price_from: 185000,
            rating: 4.8,
            tags: vec![],
            summary: "Slow cruises through the canals of Alleppey.".to_string(),
            inclusions: vec![],
            exclusions: vec![],
            itinerary: serde_json::json!([
                {"day": 1, "title": "Arrival", "description": "Pickup in Kochi."}
            ]),
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let days = pkg.to_itinerary().unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, 1);
        assert!(days[0].highlights.is_empty());
    }
}
