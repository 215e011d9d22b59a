//! Shared domain and API types for the contract signing services.

pub mod audit;
pub mod document;
pub mod response;
