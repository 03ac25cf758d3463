//! Data access layer

pub mod branch_office;

pub use branch_office::{BranchOfficeListFilter, BranchOfficeRepository, BranchOfficeRepositoryImpl};
