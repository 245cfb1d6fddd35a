pub mod export;

pub use export::{collect_export_files, load_exports, parse_export};
