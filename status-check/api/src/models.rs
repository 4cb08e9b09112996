pub mod probe;
pub mod service;

pub use probe::{Envelope, EnvelopeData, ProbeResult};
pub use service::{HostPage, Service};
