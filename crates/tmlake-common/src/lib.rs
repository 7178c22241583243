pub mod error;
pub mod module;
pub mod oid;
pub mod types;

pub use error::{Result, TmlakeError};
pub use module::{IndexSpec, MetricSpec, ModuleDescriptor, WalkParams};
pub use types::{Pdu, PduValue};
