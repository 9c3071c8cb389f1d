mod ingest;

pub use ingest::{
    discover_documents, parse_document_file_with_timeout, IngestFailure, IngestReport,
    IngestService,
};
