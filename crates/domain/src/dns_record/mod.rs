pub mod record;
pub mod record_type;

pub use record::ResourceRecord;
pub use record_type::RecordType;
