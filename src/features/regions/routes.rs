use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::{ProvinceService, RegionService};

/// Create routes for regions and provinces
pub fn routes(regions: Arc<RegionService>, provinces: Arc<ProvinceService>) -> Router {
    let region_routes = Router::new()
        .route(
            "/api/regions",
            get(handlers::list_regions).post(handlers::create_region),
        )
        // Fixed segments must come before {id}
        .route("/api/regions/all", get(handlers::list_all_regions))
        .route(
            "/api/regions/{id}",
            get(handlers::get_region)
                .put(handlers::update_region)
                .delete(handlers::delete_region),
        )
        .route("/api/regions/{id}/edit", get(handlers::edit_region))
        .with_state(regions);

    let province_routes = Router::new()
        .route(
            "/api/provinces",
            get(handlers::list_provinces).post(handlers::create_province),
        )
        .route("/api/provinces/all", get(handlers::list_all_provinces))
        .route("/api/provinces/new", get(handlers::new_province_form))
        .route(
            "/api/provinces/{id}",
            get(handlers::get_province)
                .put(handlers::update_province)
                .delete(handlers::delete_province),
        )
        .route("/api/provinces/{id}/edit", get(handlers::edit_province))
        .with_state(provinces);

    region_routes.merge(province_routes)
}
