//! # Meldgate Core
//!
//! Domain types and error definitions for the meldgate XMeld connector.
//! This crate has no framework dependencies; it defines the query model
//! and the error taxonomy that the composition engine, the transport layer,
//! and the gateway build on.
//!
//! The request pipeline is a single linear state machine:
//!
//! ```text
//! QueryInput → QueryRequest (normalized) → ValidatedQuery → document
//! ```
//!
//! No state is reachable out of order; any stage's failure is terminal for
//! that call.

pub mod error;
pub mod query;

// Re-export key types at crate root for ergonomics
pub use error::{EngineError, Error, FragmentError, Result, TransportError, ValidationError};
pub use query::{Address, AddressInput, MessageType, QueryInput, QueryRequest, ValidatedQuery};
