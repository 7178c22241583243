pub mod emitter;
pub mod exposition;
pub mod types;

pub use emitter::{EmitError, emit};
pub use exposition::render;
pub use types::{InvalidSample, MetricDescriptor, MetricSample, Sample, ValueType};
