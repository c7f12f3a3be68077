pub mod network;
pub mod fleet;
pub mod schedule;
pub mod service;

pub use fleet::airplane_image_path;
pub use service::CatalogService;
