//! Service Layer - Search form state

pub mod form;

pub use form::SearchForm;
