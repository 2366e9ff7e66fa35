pub mod reader;
pub mod writer;

pub use reader::read_csv;
pub use writer::{output_path, ParquetOptions, ParquetSink};
