pub mod entry;
pub mod item;
pub mod record;

pub use entry::{RawEntry, RawSource, RawTag, RawTime};
pub use item::{NewsItem, UNKNOWN_SOURCE};
pub use record::CanonicalRecord;
