//! # Meldgate Transport
//!
//! The I/O collaborators around the composition engine: the SOAP client for
//! the registry's XoevService endpoint, the XMeld 1333 response parser, PII
//! masking for log output, and the subprocess bridge to the external JVM
//! processing engine.

pub mod bridge;
pub mod mask;
pub mod response;
pub mod soap;

pub use bridge::{EngineBridge, EngineSettings};
pub use mask::PiiMasker;
pub use response::parse_response;
pub use soap::{DEFAULT_ENDPOINT, SoapClient};
