//! HTTP implementations of the workflow store traits.

mod accounts;
mod catalog;
mod requests;

pub use accounts::HttpDirectory;
pub use catalog::HttpCatalogStore;
pub use requests::HttpRequestStore;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests;
