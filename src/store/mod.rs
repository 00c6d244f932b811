pub mod compressed_store;
pub mod error;
