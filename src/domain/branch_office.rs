//! Branch office domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Branch office entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BranchOffice {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub fax_number: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BranchOffice {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Columns that can be searched or looked up by value.
///
/// User input never reaches SQL as an identifier; it is parsed into this
/// enum first and each variant maps to a fixed column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BranchOfficeField {
    Id,
    Name,
    Address,
    PhoneNumber,
    FaxNumber,
    City,
}

impl BranchOfficeField {
    /// Fields a list keyword may be matched against
    pub const SEARCHABLE: [BranchOfficeField; 2] =
        [BranchOfficeField::Name, BranchOfficeField::Address];

    pub fn column(&self) -> &'static str {
        match self {
            BranchOfficeField::Id => "id",
            BranchOfficeField::Name => "name",
            BranchOfficeField::Address => "address",
            BranchOfficeField::PhoneNumber => "phone_number",
            BranchOfficeField::FaxNumber => "fax_number",
            BranchOfficeField::City => "city",
        }
    }

    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }
}

impl std::str::FromStr for BranchOfficeField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(BranchOfficeField::Id),
            "name" => Ok(BranchOfficeField::Name),
            "address" => Ok(BranchOfficeField::Address),
            "phone_number" => Ok(BranchOfficeField::PhoneNumber),
            "fax_number" => Ok(BranchOfficeField::FaxNumber),
            "city" => Ok(BranchOfficeField::City),
            _ => Err(format!("Unknown branch office field: {}", s)),
        }
    }
}

impl std::fmt::Display for BranchOfficeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Keep only allowlisted fields, accepting repeated and comma-separated
/// values. Unknown or disallowed names are silently dropped.
pub fn clear_invalid_fields(
    fields: &[String],
    allowed: &[BranchOfficeField],
) -> Vec<BranchOfficeField> {
    let mut result = Vec::new();
    for field in fields
        .iter()
        .flat_map(|f| f.split(','))
        .filter_map(|f| f.parse::<BranchOfficeField>().ok())
    {
        if allowed.contains(&field) && !result.contains(&field) {
            result.push(field);
        }
    }
    result
}

/// Which rows a list/count scan covers with respect to soft deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashScope {
    /// Default scope: rows with `deleted_at IS NULL`
    #[default]
    WithoutTrashed,
    /// Only soft-deleted rows
    OnlyTrashed,
}

/// Allowed values for the `status` list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Deleted,
}

impl ListStatus {
    pub const ALLOWED: [&'static str; 1] = ["deleted"];

    pub fn trash_scope(status: Option<ListStatus>) -> TrashScope {
        match status {
            Some(ListStatus::Deleted) => TrashScope::OnlyTrashed,
            None => TrashScope::WithoutTrashed,
        }
    }
}

impl std::str::FromStr for ListStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "deleted" => Ok(ListStatus::Deleted),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Input for creating a branch office
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBranchOfficeInput {
    #[validate(custom(function = "required"), length(max = 36))]
    pub id: String,
    #[validate(custom(function = "required"), length(max = 100))]
    pub name: String,
    #[validate(custom(function = "required"), length(max = 100))]
    pub address: String,
    #[validate(custom(function = "required"), length(max = 100))]
    pub phone_number: String,
    #[validate(custom(function = "required"), length(max = 100))]
    pub city: String,
    #[validate(custom(function = "required"), length(max = 100))]
    pub fax_number: String,
}

/// Input for a partial update. Absent or empty fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBranchOfficeInput {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub phone_number: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub fax_number: Option<String>,
}

impl UpdateBranchOfficeInput {
    /// True when no field would change the stored row
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.address,
            &self.phone_number,
            &self.city,
            &self.fax_number,
        ]
        .iter()
        .all(|v| v.as_deref().is_none_or(str::is_empty))
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn allowed_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || ListStatus::ALLOWED.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("oneof"))
    }
}

/// Query parameters for the paginated list endpoint, as bound from the URL
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBranchOfficeQuery {
    /// Fields the keyword is matched against (`name`, `address`)
    #[serde(default)]
    pub fields: Vec<String>,
    pub keyword: Option<String>,
    #[validate(range(min = 1))]
    pub limit: Option<i64>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    /// `deleted` lists only soft-deleted branch offices
    #[validate(custom(function = "allowed_status"))]
    pub status: Option<String>,
}

/// Validated list request with pagination defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBranchOfficeRequest {
    /// `None` when the caller did not name any field
    pub fields: Option<Vec<String>>,
    pub keyword: Option<String>,
    pub limit: i64,
    pub page: i64,
    pub status: Option<ListStatus>,
}

/// Query parameters for the simple (dropdown) list endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimpleBranchOfficeQuery {
    pub keyword: Option<String>,
}

/// Branch office as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BranchOfficeResource {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub fax_number: String,
    pub city: String,
    /// Unix timestamp (seconds)
    pub created_at: i64,
}

impl From<BranchOffice> for BranchOfficeResource {
    fn from(m: BranchOffice) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            phone_number: m.phone_number,
            fax_number: m.fax_number,
            city: m.city,
            created_at: m.created_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimpleBranchOfficeResource {
    pub id: String,
    pub name: String,
}

impl From<BranchOffice> for SimpleBranchOfficeResource {
    fn from(m: BranchOffice) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}
