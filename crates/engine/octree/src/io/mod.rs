//! Scene ingestion formats

pub mod obj;

pub use obj::load_obj;
