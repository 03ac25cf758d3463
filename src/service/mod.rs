//! Business logic layer

pub mod branch_office;

pub use branch_office::{BranchOfficeService, ExistsByFieldInput};
