pub mod product_queries;

pub use product_queries::{PgProductRepository, ProductRepository};

#[cfg(test)]
pub use product_queries::MockProductRepository;
