//! Client-side core of the relationship dashboard: the paginated data grid
//! controller and the news wrapper.

pub mod attachments;
pub mod data_page;
pub mod dialog;
pub mod export;
pub mod form;
pub mod news;
pub mod pagination;
pub mod view;

pub use data_page::{DataPage, DataPageDeps, DataPageError, DeleteOutcome, LoadOutcome, PageSnapshot};
pub use dialog::{ConfirmPrompt, DialogService, Notice, NoticeKind};
pub use export::{ExportSink, ExportTable, XlsxExportSink};
pub use form::EditForm;
pub use news::{NewsQuery, NewsService};
