//! External collaborators: catalog, host library and number extraction.

pub mod anitomy;
pub mod bangumi;
pub mod catalog;
pub mod library;
