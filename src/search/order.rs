use super::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record attributes the directory can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    FirstName,
    #[default]
    LastName,
    City,
    Degree,
    YearsOfExperience,
    PhoneNumber,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::FirstName,
        SortField::LastName,
        SortField::City,
        SortField::Degree,
        SortField::YearsOfExperience,
        SortField::PhoneNumber,
        SortField::CreatedAt,
    ];

    /// Wire name, as accepted in the `orderBy` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::City => "city",
            Self::Degree => "degree",
            Self::YearsOfExperience => "yearsOfExperience",
            Self::PhoneNumber => "phoneNumber",
            Self::CreatedAt => "createdAt",
        }
    }

    /// Backing column in the `advocates` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::City => "city",
            Self::Degree => "degree",
            Self::YearsOfExperience => "years_of_experience",
            Self::PhoneNumber => "phone_number",
            Self::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = QueryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| QueryError::InvalidOrderField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort direction: {s}")),
        }
    }
}

/// A `(field, direction)` ordering for directory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderDirective {
    pub field: SortField,
    pub direction: SortDirection,
}

impl OrderDirective {
    /// SQL for an `ORDER BY` clause, without the keyword.
    ///
    /// Rows that tie on the chosen field come back in id order.
    pub fn order_by_clause(&self) -> String {
        format!(
            "advocates.{} {}, advocates.id ASC",
            self.field.column(),
            self.direction.keyword()
        )
    }
}

/// Build an ordering from an optional field name and direction.
///
/// Defaults to `lastName` ascending. A field name that is not one of the
/// sortable record attributes is rejected.
pub fn build_order_directive(
    field: Option<&str>,
    direction: Option<SortDirection>,
) -> Result<OrderDirective, QueryError> {
    let field = match field {
        Some(name) => name.parse()?,
        None => SortField::default(),
    };

    Ok(OrderDirective {
        field,
        direction: direction.unwrap_or_default(),
    })
}
