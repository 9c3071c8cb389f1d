//! Document normalization for the civic-information assistant's ingestion
//! pipeline.
//!
//! Uploaded and crawled files (PDF, DOCX, CSV, XLS/XLSX, TXT, Markdown) are
//! turned into a single block of clean, line-delimited text plus a small,
//! bounded metadata map, ready for chunking and embedding.
//!
//! ```no_run
//! let (text, metadata) = civicdoc::parse_document_file("uploads/permit-fees.xlsx")?;
//! println!("{} sheets", metadata["sheet_names"].as_array().map_or(0, Vec::len));
//! println!("{text}");
//! # Ok::<(), civicdoc::DocumentParseError>(())
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod services;

pub use error::{CivicdocError, DocumentParseError};
pub use models::{DocumentFormat, Metadata, ParsedDocument};
pub use processing::{parse_document_file, DocumentNormalizer};
