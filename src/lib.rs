pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod records;
pub mod scheme;
pub mod tabular;
pub mod transforms;

// Re-export the types most callers touch
pub use config::Config;
pub use error::{EtlError, Result};
pub use normalize::Normalizer;
pub use records::{KeyedSet, RelationshipRecord, StandardRecord};
pub use scheme::CodeScheme;
pub use tabular::{parse_file, parse_str, write_records, Table};
pub use transforms::{JobContext, JobReport, Transform, TransformRegistry};
