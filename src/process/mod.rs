// src/process/mod.rs

pub mod clean;
pub mod conform;
pub mod convert;
pub mod date_parser;
pub mod frame;
pub mod timestamps;
pub mod utils;

pub use clean::{clean, clean_by_name, CleanOptions, Cleaner, NOT_RECORDED};
pub use conform::{conform, validate};
pub use frame::Frame;
pub use timestamps::normalize_timestamps;
