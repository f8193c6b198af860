pub mod consolidated;
pub mod report;
pub mod shipment;

pub use consolidated::{
    fmt2, fmt2_opt, BillingRecord, ChargeBreakdown, ConsolidatedGroup, LedgerEntry,
};
pub use report::{FailedInvoice, GenerateReport, GeneratedInvoice};
pub use shipment::{NormalizedRow, ShipmentRow};
