//! Domain models for Branch Office Core

pub mod branch_office;
pub mod common;

pub use branch_office::*;
