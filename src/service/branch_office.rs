//! Branch office business logic

use crate::domain::common::{sanitize_keyword, total_pages};
use crate::domain::{
    clear_invalid_fields, BranchOffice, BranchOfficeField, CreateBranchOfficeInput,
    ListBranchOfficeRequest, ListStatus, SimpleBranchOfficeQuery, UpdateBranchOfficeInput,
};
use crate::error::{AppError, Result};
use crate::repository::{BranchOfficeListFilter, BranchOfficeRepository};
use std::sync::Arc;
use tracing::info;

/// Input for a by-field existence check
#[derive(Debug, Clone)]
pub struct ExistsByFieldInput {
    pub field: BranchOfficeField,
    pub value: String,
    /// A match on this id does not count
    pub except_id: Option<String>,
    /// Defaults to `false`
    pub with_trash: Option<bool>,
}

impl ExistsByFieldInput {
    pub fn new(field: BranchOfficeField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            except_id: None,
            with_trash: None,
        }
    }
}

pub struct BranchOfficeService<R: BranchOfficeRepository> {
    repo: Arc<R>,
}

impl<R: BranchOfficeRepository> BranchOfficeService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Turn a validated list request into a repository filter.
    ///
    /// No field list means name-only search; unknown fields are dropped.
    fn list_filter(req: &ListBranchOfficeRequest) -> BranchOfficeListFilter {
        let fields = match &req.fields {
            Some(fields) => clear_invalid_fields(fields, &BranchOfficeField::SEARCHABLE),
            None => vec![BranchOfficeField::Name],
        };

        BranchOfficeListFilter {
            fields,
            keyword: req.keyword.as_deref().map(sanitize_keyword),
            limit: Some(req.limit),
            page: Some(req.page),
            trash: ListStatus::trash_scope(req.status),
        }
    }

    pub async fn exists_by_id(&self, id: &str, with_trash: bool) -> Result<bool> {
        match self.repo.find_by_id(id, with_trash).await {
            Ok(office) => Ok(office.is_some()),
            Err(AppError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn exists_by_field(&self, input: &ExistsByFieldInput) -> Result<bool> {
        let office = match self
            .repo
            .find_by_field(input.field, &input.value, input.with_trash.unwrap_or(false))
            .await
        {
            Ok(office) => office,
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(match (office, input.except_id.as_deref()) {
            (Some(office), Some(except_id)) => office.id != except_id,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    pub async fn list(&self, req: &ListBranchOfficeRequest) -> Result<Vec<BranchOffice>> {
        self.repo.list(&Self::list_filter(req)).await
    }

    /// Returns `(total_rows, total_pages)` for the request's filter
    pub async fn total_rows_and_pages(&self, req: &ListBranchOfficeRequest) -> Result<(i64, i64)> {
        let total_rows = self.repo.count(&Self::list_filter(req)).await?;
        Ok((total_rows, total_pages(total_rows, req.limit)))
    }

    pub async fn list_simple(&self, query: &SimpleBranchOfficeQuery) -> Result<Vec<BranchOffice>> {
        let filter = BranchOfficeListFilter {
            fields: vec![BranchOfficeField::Name],
            keyword: query.keyword.as_deref().map(sanitize_keyword),
            ..Default::default()
        };
        self.repo.list(&filter).await
    }

    pub async fn get(&self, id: &str) -> Result<BranchOffice> {
        self.repo
            .find_by_id(id, false)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Branch office {} not found", id)))
    }

    pub async fn create(&self, input: CreateBranchOfficeInput) -> Result<BranchOffice> {
        let office = self.repo.create(&input).await?;
        info!(branch_office_id = %office.id, "Branch office created");
        Ok(office)
    }

    pub async fn update(&self, id: &str, input: UpdateBranchOfficeInput) -> Result<BranchOffice> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let partial = UpdateBranchOfficeInput {
            name: present(input.name),
            address: present(input.address),
            phone_number: present(input.phone_number),
            city: present(input.city),
            fax_number: present(input.fax_number),
        };

        if partial.is_empty() {
            return self.get(id).await;
        }

        let office = self
            .repo
            .update(id, &partial)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Branch office {} not found", id)))?;
        info!(branch_office_id = %id, "Branch office updated");
        Ok(office)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<()> {
        self.repo.soft_delete(id).await?;
        info!(branch_office_id = %id, "Branch office soft-deleted");
        Ok(())
    }

    pub async fn hard_delete(&self, id: &str) -> Result<()> {
        self.repo.hard_delete(id).await?;
        info!(branch_office_id = %id, "Branch office permanently deleted");
        Ok(())
    }

    pub async fn restore(&self, id: &str) -> Result<()> {
        self.repo.restore(id).await?;
        info!(branch_office_id = %id, "Branch office restored");
        Ok(())
    }
}
