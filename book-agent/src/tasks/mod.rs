// Reply workflow tasks, one per dispatch state that does work
pub mod deliver_document;
pub mod not_found;
pub mod search;
pub mod summarize;

pub use deliver_document::{DOCUMENT_CAPTION, DeliverDocumentTask};
pub use not_found::NotFoundTask;
pub use search::SearchTask;
pub use summarize::SummarizeTask;
