pub mod markers;
pub mod table_extractor;
