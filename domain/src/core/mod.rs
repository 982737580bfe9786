//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`output_format::OutputFormat`]: how results are printed
//! - [`string::truncate`]: UTF-8 safe truncation for log previews

pub mod error;
pub mod output_format;
pub mod string;
