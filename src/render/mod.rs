//! Rendering of detected tables to output formats.

mod table;

pub use table::{plain_rows, table_to_csv, table_to_markdown, TableMarkdown};
