//! Filter, sort and paginate pipeline over the record sequence
//!
//! ```rust
//! use user_search::engine::{search, OrderBy, SearchQuery};
//! use user_search::models::Record;
//!
//! let records = vec![Record {
//!     id: 0,
//!     first_name: "Boyd".to_string(),
//!     last_name: "Wolf".to_string(),
//!     age: 22,
//!     gender: "male".to_string(),
//!     about: "Nulla cillum enim".to_string(),
//! }];
//!
//! let query = SearchQuery {
//!     limit: 10,
//!     offset: 0,
//!     query: "Wolf".to_string(),
//!     order_field: "Age".to_string(),
//!     order_by: OrderBy::Asc,
//! };
//!
//! let users = search(records, &query).unwrap();
//! assert_eq!(users[0].name, "Boyd Wolf");
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::SearchError;
use crate::models::{Record, User};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Descending (-1)
    Desc,
    /// Store order (0)
    #[default]
    AsIs,
    /// Ascending (1)
    Asc,
}

impl OrderBy {
    /// Wire value of this direction
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Desc => -1,
            Self::AsIs => 0,
            Self::Asc => 1,
        }
    }
}

impl TryFrom<i64> for OrderBy {
    type Error = SearchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Desc),
            0 => Ok(Self::AsIs),
            1 => Ok(Self::Asc),
            other => Err(SearchError::InvalidOrderBy(other)),
        }
    }
}

/// Sortable user field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    Id,
    #[default]
    Name,
    Age,
}

type Comparator = fn(&User, &User) -> Ordering;

fn by_id(a: &User, b: &User) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_name(a: &User, b: &User) -> Ordering {
    a.name.cmp(&b.name)
}

fn by_age(a: &User, b: &User) -> Ordering {
    a.age.cmp(&b.age)
}

impl OrderField {
    /// Resolve a wire field name; empty means `Name`
    pub fn parse(field: &str) -> Result<Self, SearchError> {
        match field {
            "" | "Name" => Ok(Self::Name),
            "ID" => Ok(Self::Id),
            "Age" => Ok(Self::Age),
            other => Err(SearchError::InvalidOrderField(other.to_string())),
        }
    }

    /// Ascending comparator for this field
    #[must_use]
    pub fn comparator(self) -> Comparator {
        match self {
            Self::Id => by_id,
            Self::Name => by_name,
            Self::Age => by_age,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "ID"),
            Self::Name => write!(f, "Name"),
            Self::Age => write!(f, "Age"),
        }
    }
}

/// Validated search parameters
///
/// `order_field` stays a raw string: it is resolved inside [`search`]
/// together with the sort step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub limit: usize,
    pub offset: usize,
    pub query: String,
    pub order_field: String,
    pub order_by: OrderBy,
}

/// Keep records whose full name or about text contains `query`
pub fn filter(records: Vec<Record>, query: &str) -> Vec<User> {
    records
        .into_iter()
        .filter(|record| record.full_name().contains(query) || record.about.contains(query))
        .map(User::from)
        .collect()
}

/// Stable sort by `field` in direction `order_by`
pub fn sort(users: &mut [User], field: OrderField, order_by: OrderBy) {
    let cmp = field.comparator();
    match order_by {
        OrderBy::AsIs => {}
        OrderBy::Asc => users.sort_by(cmp),
        OrderBy::Desc => users.sort_by(|a, b| cmp(b, a)),
    }
}

/// Slice `offset..offset + limit`, clamped to the sequence
pub fn paginate(mut users: Vec<User>, offset: usize, limit: usize) -> Vec<User> {
    if offset >= users.len() {
        return Vec::new();
    }
    let end = offset.saturating_add(limit).min(users.len());
    users.truncate(end);
    users.drain(..offset);
    users
}

/// Run filter, field resolution, sort and pagination
pub fn search(records: Vec<Record>, query: &SearchQuery) -> Result<Vec<User>, SearchError> {
    let mut users = filter(records, &query.query);
    let field = OrderField::parse(&query.order_field)?;
    sort(&mut users, field, query.order_by);
    tracing::debug!(
        matched = users.len(),
        order_field = %field,
        order_by = query.order_by.as_i64(),
        "Filtered and sorted"
    );
    Ok(paginate(users, query.offset, query.limit))
}
