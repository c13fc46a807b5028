//! Error handling for the link-bingo engine.

pub mod domain;

pub use domain::DomainError;
