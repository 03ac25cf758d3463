//! Branch office repository

use crate::domain::common::{escape_like, page_offset};
use crate::domain::{
    BranchOffice, BranchOfficeField, CreateBranchOfficeInput, TrashScope, UpdateBranchOfficeInput,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const COLUMNS: &str = "id, name, address, phone_number, fax_number, city, created_at, deleted_at";

/// Filter shared by `list` and `count`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchOfficeListFilter {
    /// Allowlisted columns the keyword is matched against
    pub fields: Vec<BranchOfficeField>,
    /// Already sanitized keyword
    pub keyword: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub trash: TrashScope,
}

impl BranchOfficeListFilter {
    /// `%keyword%` pattern, only when both a keyword and fields are present
    pub fn keyword_pattern(&self) -> Option<String> {
        let keyword = self.keyword.as_deref().filter(|k| !k.is_empty())?;
        if self.fields.is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(keyword)))
    }

    /// `(limit, offset)` when both limit and page are supplied
    pub fn pagination(&self) -> Option<(i64, i64)> {
        match (self.limit, self.page) {
            (Some(limit), Some(page)) => Some((limit, page_offset(page, limit))),
            _ => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchOfficeRepository: Send + Sync {
    async fn list(&self, filter: &BranchOfficeListFilter) -> Result<Vec<BranchOffice>>;
    async fn count(&self, filter: &BranchOfficeListFilter) -> Result<i64>;
    async fn find_by_id(&self, id: &str, with_trash: bool) -> Result<Option<BranchOffice>>;
    async fn find_by_field(
        &self,
        field: BranchOfficeField,
        value: &str,
        with_trash: bool,
    ) -> Result<Option<BranchOffice>>;
    async fn create(&self, input: &CreateBranchOfficeInput) -> Result<BranchOffice>;
    /// Returns `None` when no live row has this id
    async fn update(
        &self,
        id: &str,
        input: &UpdateBranchOfficeInput,
    ) -> Result<Option<BranchOffice>>;
    async fn soft_delete(&self, id: &str) -> Result<()>;
    async fn hard_delete(&self, id: &str) -> Result<()>;
    async fn restore(&self, id: &str) -> Result<()>;
}

pub struct BranchOfficeRepositoryImpl {
    pool: PgPool,
}

impl BranchOfficeRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn trash_clause(with_trash: bool) -> &'static str {
    if with_trash {
        ""
    } else {
        " AND deleted_at IS NULL"
    }
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &BranchOfficeListFilter) {
    match filter.trash {
        TrashScope::WithoutTrashed => qb.push(" WHERE deleted_at IS NULL"),
        TrashScope::OnlyTrashed => qb.push(" WHERE deleted_at IS NOT NULL"),
    };

    if let Some(pattern) = filter.keyword_pattern() {
        qb.push(" AND (");
        let mut predicates = qb.separated(" OR ");
        for field in &filter.fields {
            predicates.push(field.column());
            predicates.push_unseparated(" ILIKE ");
            predicates.push_bind_unseparated(pattern.clone());
        }
        qb.push(")");
    }
}

fn list_query(filter: &BranchOfficeListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM branch_offices", COLUMNS));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY name ASC");
    if let Some((limit, offset)) = filter.pagination() {
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);
    }
    qb
}

fn count_query(filter: &BranchOfficeListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM branch_offices");
    push_filters(&mut qb, filter);
    qb
}

#[async_trait]
impl BranchOfficeRepository for BranchOfficeRepositoryImpl {
    async fn list(&self, filter: &BranchOfficeListFilter) -> Result<Vec<BranchOffice>> {
        let offices = list_query(filter)
            .build_query_as::<BranchOffice>()
            .fetch_all(&self.pool)
            .await?;

        Ok(offices)
    }

    async fn count(&self, filter: &BranchOfficeListFilter) -> Result<i64> {
        let total: i64 = count_query(filter)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_by_id(&self, id: &str, with_trash: bool) -> Result<Option<BranchOffice>> {
        let sql = format!(
            "SELECT {} FROM branch_offices WHERE id = $1{}",
            COLUMNS,
            trash_clause(with_trash)
        );
        let office = sqlx::query_as::<_, BranchOffice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(office)
    }

    async fn find_by_field(
        &self,
        field: BranchOfficeField,
        value: &str,
        with_trash: bool,
    ) -> Result<Option<BranchOffice>> {
        let sql = format!(
            "SELECT {} FROM branch_offices WHERE {} = $1{} ORDER BY id LIMIT 1",
            COLUMNS,
            field.column(),
            trash_clause(with_trash)
        );
        let office = sqlx::query_as::<_, BranchOffice>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(office)
    }

    async fn create(&self, input: &CreateBranchOfficeInput) -> Result<BranchOffice> {
        let sql = format!(
            r#"
            INSERT INTO branch_offices (id, name, address, phone_number, fax_number, city, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING {}
            "#,
            COLUMNS
        );
        let office = sqlx::query_as::<_, BranchOffice>(&sql)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone_number)
            .bind(&input.fax_number)
            .bind(&input.city)
            .fetch_one(&self.pool)
            .await?;

        Ok(office)
    }

    async fn update(
        &self,
        id: &str,
        input: &UpdateBranchOfficeInput,
    ) -> Result<Option<BranchOffice>> {
        // Empty strings count as "not supplied" and keep the stored value
        let sql = format!(
            r#"
            UPDATE branch_offices
            SET name = COALESCE(NULLIF($2, ''), name),
                address = COALESCE(NULLIF($3, ''), address),
                phone_number = COALESCE(NULLIF($4, ''), phone_number),
                fax_number = COALESCE(NULLIF($5, ''), fax_number),
                city = COALESCE(NULLIF($6, ''), city)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        );
        let office = sqlx::query_as::<_, BranchOffice>(&sql)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.address.as_deref())
            .bind(input.phone_number.as_deref())
            .bind(input.fax_number.as_deref())
            .bind(input.city.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(office)
    }

    async fn soft_delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE branch_offices SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Branch office {} not found", id)));
        }

        Ok(())
    }

    async fn hard_delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM branch_offices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Branch office {} not found", id)));
        }

        Ok(())
    }

    async fn restore(&self, id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE branch_offices SET deleted_at = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Branch office {} not found", id)));
        }

        Ok(())
    }
}
