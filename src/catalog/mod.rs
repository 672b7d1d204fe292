pub mod certification;
pub mod derive;
mod lenient;
pub mod model;
pub mod rating;
pub mod rows;

pub use certification::{normalize_certifications, Certification};
pub use derive::{build_facet_options, effective_bio, flatten, parse_timestamp, Effective};
pub use model::{Address, City, Commerce, Department, NamedRef, Producer};
pub use rating::Rating;
pub use rows::{Catalog, CommerceRow, ProducerCard};
