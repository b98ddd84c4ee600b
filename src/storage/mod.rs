//! Storage layer for keyseal
//!
//! JSON files with atomic writes and automatic directory creation.

pub mod file_io;

pub use file_io::{read_json, read_json_required, write_json_atomic};
