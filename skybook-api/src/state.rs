use std::path::PathBuf;
use std::sync::Arc;

use skybook_catalog::CatalogService;
use skybook_order::BookingManager;
use skybook_store::app_config::PaginationConfig;
use skybook_store::Repositories;

use crate::auth::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingManager>,
    pub auth: AuthConfig,
    /// Uploaded files are written below this directory.
    pub media_root: PathBuf,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(repos: Repositories, auth: AuthConfig, media_root: PathBuf, pagination: PaginationConfig) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(repos.catalog, repos.flights.clone())),
            bookings: Arc::new(BookingManager::new(repos.flights, repos.orders)),
            auth,
            media_root,
            pagination,
        }
    }
}
