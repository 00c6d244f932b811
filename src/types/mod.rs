pub mod artifact;
pub mod day_record;
pub mod ingest_config;
pub mod location;
pub mod run_summary;
