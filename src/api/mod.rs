pub mod client;
pub mod source;
pub mod types;
pub mod urls;

pub use client::HttpCatalogSource;
pub use source::{AnySource, FileCatalogSource};
pub use types::{decode_producers, CatalogSource, FetchError};
pub use urls::*;
