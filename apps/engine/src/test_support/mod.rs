//! Test-only helpers: in-memory fakes for the encyclopedia services.

pub mod fake_wiki;
