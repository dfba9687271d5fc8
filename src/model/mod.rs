//! Types that represent the core data model, such as `Record` and `RecordType`.
mod record;

pub use record::{Record, RecordType};
pub(crate) use record::parse_export_time;
