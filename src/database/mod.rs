pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryProductRepository;
pub use models::Product;
pub use repository::{PgProductRepository, ProductPage, ProductRepository};
