use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{AppError, DUPLICATE_NAME, Result},
    models::{Page, PageRequest, Product, ProductFilter},
    queries::ProductRepository,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Persists a new product, rejecting names that are already taken.
    async fn save(&self, product: Product) -> Result<Product>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Overwrites every field of an already persisted product.
    async fn update(&self, product: Product) -> Result<Product>;

    async fn delete(&self, product: &Product) -> Result<()>;

    async fn find(&self, filter: &ProductFilter, page: &PageRequest) -> Result<Page<Product>>;
}

pub struct ProductServiceImpl {
    repository: Arc<dyn ProductRepository>,
}

impl ProductServiceImpl {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

fn require_id(product: &Product) -> Result<i64> {
    product
        .id
        .ok_or_else(|| AppError::InvalidArgument("Product id cant be null".to_string()))
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn save(&self, product: Product) -> Result<Product> {
        if self.repository.exists_by_name(&product.name).await? {
            tracing::info!("Rejected product with duplicate name {:?}", product.name);
            return Err(AppError::Business(DUPLICATE_NAME.to_string()));
        }

        let saved = self.repository.save(product).await?;
        tracing::info!("Created product {:?}", saved.id);

        Ok(saved)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>> {
        self.repository.find_by_id(id).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Product>> {
        self.repository.find_by_name(name).await
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let id = require_id(&product)?;
        let updated = self.repository.save(product).await?;
        tracing::info!("Updated product {}", id);

        Ok(updated)
    }

    async fn delete(&self, product: &Product) -> Result<()> {
        let id = require_id(product)?;
        self.repository.delete(product).await?;
        tracing::info!("Deleted product {}", id);

        Ok(())
    }

    async fn find(&self, filter: &ProductFilter, page: &PageRequest) -> Result<Page<Product>> {
        tracing::debug!(
            "Searching products (filtered: {}) page {} size {}",
            !filter.is_empty(),
            page.page,
            page.size
        );
        self.repository.find_by_example(filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::MockProductRepository;

    fn product(id: Option<i64>) -> Product {
        Product {
            id,
            name: "corona".to_string(),
            description: "As aventuras".to_string(),
            price: 100.0,
            brand: "123".to_string(),
        }
    }

    fn service(repository: MockProductRepository) -> ProductServiceImpl {
        ProductServiceImpl::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn save_assigns_an_id() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_exists_by_name()
            .withf(|name| name == "corona")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_save()
            .times(1)
            .returning(|p| Ok(Product { id: Some(11), ..p }));

        let saved = service(repository).save(product(None)).await.unwrap();

        assert_eq!(saved.id, Some(11));
        assert_eq!(saved.name, "corona");
        assert_eq!(saved.description, "As aventuras");
        assert_eq!(saved.brand, "123");
        assert_eq!(saved.price, 100.0);
    }

    #[tokio::test]
    async fn save_rejects_duplicate_name_without_persisting() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_exists_by_name()
            .returning(|_| Ok(true));
        repository.expect_save().never();

        let err = service(repository).save(product(None)).await.unwrap_err();

        match err {
            AppError::Business(msg) => assert_eq!(msg, "Name already registered"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn get_by_id_passes_through() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_id()
            .withf(|id| *id == 11)
            .returning(|id| Ok(Some(product(Some(id)))));
        repository
            .expect_find_by_id()
            .withf(|id| *id == 12)
            .returning(|_| Ok(None));

        let service = service(repository);

        assert_eq!(service.get_by_id(11).await.unwrap(), Some(product(Some(11))));
        assert_eq!(service.get_by_id(12).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_by_name_passes_through() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_name()
            .withf(|name| name == "corona")
            .returning(|_| Ok(Some(product(Some(1)))));

        let found = service(repository).get_by_name("corona").await.unwrap();

        assert_eq!(found.and_then(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn update_overwrites_the_stored_row() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_save()
            .withf(|p| p.id == Some(1) && p.name == "renamed")
            .times(1)
            .returning(Ok);

        let updated = service(repository)
            .update(Product {
                name: "renamed".to_string(),
                ..product(Some(1))
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "renamed");
    }

    #[tokio::test]
    async fn update_requires_an_id() {
        let mut repository = MockProductRepository::new();
        repository.expect_save().never();

        let err = service(repository).update(product(None)).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_product() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_delete()
            .withf(|p| p.id == Some(1))
            .times(1)
            .returning(|_| Ok(()));

        service(repository).delete(&product(Some(1))).await.unwrap();
    }

    #[tokio::test]
    async fn delete_requires_an_id() {
        let mut repository = MockProductRepository::new();
        repository.expect_delete().never();

        let err = service(repository).delete(&product(None)).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn find_delegates_filter_and_paging() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_example()
            .withf(|filter, page| {
                filter.name.as_deref() == Some("cor") && page.page == 0 && page.size == 100
            })
            .returning(|_, page| Ok(Page::new(vec![product(Some(1))], page, 1)));

        let filter = ProductFilter {
            name: Some("cor".to_string()),
            ..Default::default()
        };
        let page = service(repository)
            .find(&filter, &PageRequest::of(0, 100))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.pageable.page_size, 100);
        assert_eq!(page.pageable.page_number, 0);
    }
}
