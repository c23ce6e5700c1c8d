use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use catalog_services::{
    CatalogError, CreatePackageRequest, PackageFilters, PackageService, UpdatePackageRequest,
};

/// GET /api/packages
///
/// Public catalog listing with optional `region`, `duration` and `max_price`
/// query filters.
pub async fn list_packages(
    pool: web::Data<sqlx::PgPool>,
    filters: web::Query<PackageFilters>,
) -> Result<HttpResponse, CatalogError> {
    let package_service = PackageService::new(pool.get_ref().clone());
    let packages = package_service.find_packages(&filters).await?;
    Ok(HttpResponse::Ok().json(packages))
}

/// GET /api/packages/featured
pub async fn featured_packages(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, CatalogError> {
    let package_service = PackageService::new(pool.get_ref().clone());
    let packages = package_service.featured_packages(6).await?;
    Ok(HttpResponse::Ok().json(packages))
}

/// GET /api/packages/{slug}
pub async fn get_package(
    pool: web::Data<sqlx::PgPool>,
    slug: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let package_service = PackageService::new(pool.get_ref().clone());

    match package_service.get_by_slug(&slug).await? {
        Some(package) => Ok(HttpResponse::Ok().json(package)),
        None => Err(CatalogError::NotFound),
    }
}

/// GET /api/admin/packages
///
/// Full catalog for the staff console, featured or not.
pub async fn admin_list_packages(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, CatalogError> {
    let package_service = PackageService::new(pool.get_ref().clone());
    let packages = package_service.list_packages().await?;
    Ok(HttpResponse::Ok().json(packages))
}

/// POST /api/admin/packages
pub async fn create_package(
    pool: web::Data<sqlx::PgPool>,
    request: web::Json<CreatePackageRequest>,
) -> Result<HttpResponse, CatalogError> {
    request
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))?;

    let package_service = PackageService::new(pool.get_ref().clone());
    let package = package_service.create_package(&request).await?;
    Ok(HttpResponse::Created().json(package))
}

/// PUT /api/admin/packages/{id}
pub async fn update_package(
    pool: web::Data<sqlx::PgPool>,
    package_id: web::Path<Uuid>,
    request: web::Json<UpdatePackageRequest>,
) -> Result<HttpResponse, CatalogError> {
    request
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))?;

    let package_service = PackageService::new(pool.get_ref().clone());
    let package = package_service.update_package(&package_id, &request).await?;
    Ok(HttpResponse::Ok().json(package))
}

/// DELETE /api/admin/packages/{id}
pub async fn delete_package(
    pool: web::Data<sqlx::PgPool>,
    package_id: web::Path<Uuid>,
) -> Result<HttpResponse, CatalogError> {
    let package_service = PackageService::new(pool.get_ref().clone());

    package_service.delete_package(&package_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
