pub mod charge;
pub mod consolidator;
pub mod error;
pub mod generator;
pub mod normalizer;
pub mod render;
pub mod session;

pub use error::GenerateError;
pub use generator::InvoiceGenerator;
pub use render::{DocumentRenderer, TemplateRenderer};
pub use session::SessionStore;
