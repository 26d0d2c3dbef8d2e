// Adapters layer: concrete collaborators around the engine (tabular input, loading, reports).

pub mod csv_table;
pub mod loader;
pub mod report;

pub use loader::CsvLoader;
pub use report::ReportWriter;
