pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod flight_repo;
pub mod memory;
pub mod order_repo;

use std::sync::Arc;

use skybook_core::repository::{CatalogRepository, FlightRepository, OrderRepository};

pub use database::DbClient;
pub use memory::MemoryStore;

use catalog_repo::StoreCatalogRepository;
use flight_repo::PostgresFlightRepository;
use order_repo::StoreOrderRepository;

/// One handle per repository trait, all backed by the same storage.
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self { catalog: store.clone(), flights: store.clone(), orders: store }
    }

    pub fn postgres(db: &DbClient) -> Self {
        Self {
            catalog: Arc::new(StoreCatalogRepository::new(db.pool.clone())),
            flights: Arc::new(PostgresFlightRepository::new(db.pool.clone())),
            orders: Arc::new(StoreOrderRepository::new(db.pool.clone())),
        }
    }
}
