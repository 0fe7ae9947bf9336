//! Transaction records and the file-backed transaction store
//!
//! - models: the `Transaction` record and timestamp parsing
//! - document: whole-document JSON persistence
//! - store: query and mutation operations over the document

pub mod document;
pub mod error;
pub mod models;
pub mod store;

pub use document::{JsonFileDocument, RecordDocument};
pub use error::{CoreError, CoreResult, ErrorDetails};
pub use models::{parse_timestamp, Transaction};
pub use store::{LoadMode, TransactionStore};
