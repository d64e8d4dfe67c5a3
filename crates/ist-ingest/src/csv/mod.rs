//! CSV reading utilities.

mod missing;
mod reader;

pub use missing::{MISSING_TOKENS, clean_cell, is_missing_token};
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, dataframe_to_source_table,
    read_source_table, validate_encoding,
};
