use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::PagingConfig,
    error::{AppError, Result},
    models::params::{first_value, parse_value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortProperty {
    Id,
    Name,
    Description,
    Price,
    Brand,
}

impl SortProperty {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "price" => Some(Self::Price),
            "brand" => Some(Self::Brand),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Brand => "brand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub property: SortProperty,
    pub direction: Direction,
}

impl Sort {
    /// Parses `property[,asc|desc]`.
    fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        let property = SortProperty::parse(property)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown sort property: {}", property)))?;

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(d) => {
                return Err(AppError::BadRequest(format!("Invalid sort direction: {}", d)));
            }
        };

        Ok(Self {
            property,
            direction,
        })
    }
}

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Reads `page`, `size` and `sort` from raw query pairs. A negative page
    /// becomes 0, a non-positive size falls back to the default and sizes
    /// above the maximum are clamped.
    pub fn from_query(pairs: &[(String, String)], paging: &PagingConfig) -> Result<Self> {
        let page = parse_value::<i64>(pairs, "page")?.unwrap_or(0).max(0);
        let size = match parse_value::<i64>(pairs, "size")? {
            Some(size) if size > 0 => size.min(i64::from(paging.max_page_size)),
            _ => i64::from(paging.default_page_size),
        };
        let sort = first_value(pairs, "sort").map(Sort::parse).transpose()?;

        Ok(Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            size: size as u32,
            sort,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SortInfo {
    pub sorted: bool,
    pub unsorted: bool,
    pub empty: bool,
}

impl SortInfo {
    fn from_request(sort: Option<Sort>) -> Self {
        Self {
            sorted: sort.is_some(),
            unsorted: sort.is_none(),
            empty: sort.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    pub offset: i64,
    pub paged: bool,
    pub unpaged: bool,
    pub sort: SortInfo,
}

/// A slice of results plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: u32,
    pub number: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
    pub sort: SortInfo,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = i64::from(request.size.max(1));
        let total_pages = (total_elements + size - 1) / size;
        let number = request.page;

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            pageable: Pageable {
                page_number: number,
                page_size: request.size,
                offset: request.offset(),
                paged: true,
                unpaged: false,
                sort: SortInfo::from_request(request.sort),
            },
            total_elements,
            total_pages,
            size: request.size,
            number,
            first: number == 0,
            last: i64::from(number) + 1 >= total_pages,
            sort: SortInfo::from_request(request.sort),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
            sort: self.sort,
        }
    }
}
