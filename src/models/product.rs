use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, Result},
    models::params::{first_value, parse_value},
};

/// Persisted product row. `id` stays `None` until storage assigns one.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub brand: String,
}

/// Wire representation of a product.
///
/// Text fields are optional here so that a missing field surfaces as a
/// validation message rather than a deserialization failure. A missing or
/// `null` price reads as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    #[serde(default)]
    #[schema(example = 101)]
    pub id: Option<i64>,
    #[serde(default)]
    #[schema(example = "Artur")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    #[schema(example = 10.15)]
    pub price: f64,
    #[serde(default)]
    pub brand: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProductDto {
    /// Field violations in declaration order; empty when the DTO is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("brand", &self.brand),
        ] {
            if value.as_deref().is_none_or(str::is_empty) {
                errors.push(format!("{} must not be empty", field));
            }
        }

        errors
    }
}

impl TryFrom<ProductDto> for Product {
    type Error = AppError;

    fn try_from(dto: ProductDto) -> Result<Self> {
        let errors = dto.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            price: dto.price,
            brand: dto.brand.unwrap_or_default(),
        })
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: Some(product.name),
            description: Some(product.description),
            price: product.price,
            brand: Some(product.brand),
        }
    }
}

/// Query-by-example filter. `None` fields do not constrain the search; text
/// fields match by case-insensitive containment, `price` matches exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub brand: Option<String>,
}

impl ProductFilter {
    /// Builds a filter from raw query pairs. Repeated keys keep their first
    /// value and blank values are ignored.
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self> {
        Ok(Self {
            name: first_value(pairs, "name").map(str::to_string),
            description: first_value(pairs, "description").map(str::to_string),
            price: parse_value(pairs, "price")?,
            brand: first_value(pairs, "brand").map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.brand.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_body_yields_three_violations() {
        let dto: ProductDto = serde_json::from_str("{}").unwrap();

        assert_eq!(dto.price, 0.0);
        assert_eq!(
            dto.validate(),
            vec![
                "name must not be empty",
                "description must not be empty",
                "brand must not be empty",
            ]
        );
    }

    #[test]
    fn null_price_reads_as_zero() {
        let dto: ProductDto =
            serde_json::from_str(r#"{"name":"Artur","description":"test","price":null,"brand":"corona"}"#)
                .unwrap();

        assert_eq!(dto.price, 0.0);
        assert!(dto.validate().is_empty());
    }

    #[test]
    fn blank_strings_are_rejected() {
        let dto = ProductDto {
            name: Some(String::new()),
            description: Some("test".into()),
            brand: Some("corona".into()),
            ..Default::default()
        };

        match Product::try_from(dto) {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors, vec!["name must not be empty"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn dto_and_entity_carry_the_same_fields() {
        let dto = ProductDto {
            id: Some(7),
            name: Some("Artur".into()),
            description: Some("test".into()),
            price: 10.15,
            brand: Some("corona".into()),
        };

        let product = Product::try_from(dto.clone()).unwrap();
        assert_eq!(product.id, Some(7));
        assert_eq!(product.price, 10.15);
        assert_eq!(ProductDto::from(product), dto);
    }

    #[test]
    fn filter_keeps_first_value_and_skips_blanks() {
        let filter = ProductFilter::from_query(&pairs(&[
            ("name", "Artur"),
            ("name", "10.15"),
            ("brand", ""),
            ("price", "0"),
            ("size", "100"),
        ]))
        .unwrap();

        assert_eq!(filter.name.as_deref(), Some("Artur"));
        assert_eq!(filter.brand, None);
        assert_eq!(filter.price, Some(0.0));
        assert_eq!(filter.description, None);
    }

    #[test]
    fn filter_rejects_non_numeric_price() {
        let result = ProductFilter::from_query(&pairs(&[("price", "cheap")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
