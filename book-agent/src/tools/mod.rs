pub mod search_download;
pub mod summarize_pdf;

pub use search_download::{PDF_NOT_FOUND, SearchAndDownloadTool};
pub use summarize_pdf::{SUMMARY_FAILED_PREFIX, SummarizePdfTool};
