use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, DUPLICATE_NAME, Result},
    models::{Page, PageRequest, Product, ProductFilter, SortProperty},
};

/// Storage contract for products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts when `id` is unset, otherwise overwrites the row with that id.
    async fn save(&self, product: Product) -> Result<Product>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Removes the row with the product's id. Absent rows are ignored.
    async fn delete(&self, product: &Product) -> Result<()>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    async fn find_by_example(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<Page<Product>>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn save(&self, product: Product) -> Result<Product> {
        let query = match product.id {
            None => sqlx::query_as::<_, Product>(
                "INSERT INTO products (name, description, price, brand)
                 VALUES ($1, $2, $3, $4)
                 RETURNING *",
            ),
            Some(id) => sqlx::query_as::<_, Product>(
                "INSERT INTO products (id, name, description, price, brand)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO UPDATE
                 SET name = EXCLUDED.name,
                     description = EXCLUDED.description,
                     price = EXCLUDED.price,
                     brand = EXCLUDED.brand
                 RETURNING *",
            )
            .bind(id),
        };

        query
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.brand)
            .fetch_one(&self.pool)
            .await
            .map_err(translate_unique_violation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn delete(&self, product: &Product) -> Result<()> {
        let Some(id) = product.id else {
            return Ok(());
        };

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_example(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<Page<Product>> {
        let total = count_query(filter)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let content = if page.offset() < total {
            select_query(filter, page)
                .build_query_as::<Product>()
                .fetch_all(&self.pool)
                .await?
        } else {
            Vec::new()
        };

        Ok(Page::new(content, page, total))
    }
}

const NAME_CONSTRAINT: &str = "products_name_key";

/// Only a clash on the name constraint is a duplicate name; any other
/// violation (e.g. the primary key) stays a database error.
fn translate_unique_violation(err: sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db_err)
            if db_err.is_unique_violation() && db_err.constraint() == Some(NAME_CONSTRAINT) =>
        {
            AppError::Business(DUPLICATE_NAME.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

/// Wraps `value` for a case-insensitive substring match, escaping LIKE
/// metacharacters so they match literally.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    for (column, value) in [
        ("name", &filter.name),
        ("description", &filter.description),
        ("brand", &filter.brand),
    ] {
        if let Some(value) = value {
            query.push(format!(" AND {} ILIKE ", column));
            query.push_bind(contains_pattern(value));
            query.push(" ESCAPE '\\'");
        }
    }

    if let Some(price) = filter.price {
        query.push(" AND price = ");
        query.push_bind(price);
    }
}

fn count_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
    push_filter(&mut query, filter);
    query
}

fn select_query(filter: &ProductFilter, page: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT * FROM products WHERE 1=1");
    push_filter(&mut query, filter);

    // sort
    query.push(" ORDER BY ");
    match page.sort {
        Some(sort) if sort.property != SortProperty::Id => {
            query.push(format!(
                "{} {}, id ASC",
                sort.property.column(),
                sort.direction.keyword()
            ));
        }
        Some(sort) => {
            query.push(format!("id {}", sort.direction.keyword()));
        }
        None => {
            query.push("id ASC");
        }
    }

    // pagination
    query.push(" LIMIT ");
    query.push_bind(i64::from(page.size));
    query.push(" OFFSET ");
    query.push_bind(page.offset());

    query
}
