pub mod csv_reader;
pub mod error;
pub mod ledger;

pub use csv_reader::{read_shipment_table, RawTable};
pub use error::{IngestError, IngestResult, LedgerError};
pub use ledger::{CsvLedgerSink, LedgerSink};
