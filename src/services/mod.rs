pub mod product_service;

pub use product_service::{ProductService, ProductServiceImpl};

#[cfg(test)]
pub use product_service::MockProductService;
