//! Catalog Adapter - 只读目录实现

mod json_catalog;

#[cfg(test)]
pub mod fixtures;

pub use json_catalog::JsonCatalog;
