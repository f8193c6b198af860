pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use ingest::{CsvLedgerSink, LedgerSink};
pub use service::{DocumentRenderer, InvoiceGenerator, SessionStore, TemplateRenderer};
