//! Error types for the meldgate domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own error enum folded into the top-level [`Error`].
//!
//! Validation and fragment errors are recoverable and carry structured
//! detail for caller-facing messages. Contract violations (a required field
//! empty after normalization) are a distinct, non-recoverable class: the
//! engine has no sensible default for them and fails loudly instead of
//! substituting a placeholder.

use thiserror::Error;

/// The top-level error type for all meldgate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Field-group validation ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Custom fragment validation ---
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    // --- Programming/contract violations ---
    #[error("Contract violation: required field '{field}' is empty")]
    Contract { field: &'static str },

    // --- SOAP transport ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // --- External engine bridge ---
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    // --- Configuration ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Field-group validation failures. Always recoverable; the detail fields
/// are part of the caller contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The address group was partially supplied. `missing` lists exactly
    /// the absent required sub-fields, in plz/strasse/ort order.
    #[error("incomplete address, missing required fields: {}", .missing.join(", "))]
    IncompleteAddress { missing: Vec<&'static str> },

    /// The declared message type is not one of the known variants.
    #[error("unsupported message type '{declared}' (allowed: {})", .allowed.join(", "))]
    UnsupportedMessageType {
        declared: String,
        allowed: Vec<&'static str>,
    },
}

/// Custom fragment failures, kept distinct from field validation so callers
/// can render different guidance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("custom XML must start with an element, not literal text")]
    StartsWithText,

    #[error("custom XML is not well-formed: {0}")]
    Malformed(String),
}

/// Failures talking to the registry's SOAP endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error {status}")]
    Http { status: u16 },

    #[error("SOAP fault received from the registry endpoint")]
    SoapFault,

    #[error("invalid SOAP response: missing return payload")]
    MissingReturnPayload,

    #[error("response payload could not be decoded: {0}")]
    PayloadDecode(String),

    #[error("failed to parse registry response: {0}")]
    ResponseParse(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Failures invoking the external processing engine as a subprocess.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("external runtime not found at {path}")]
    RuntimeNotFound { path: String },

    #[error("failed to spawn external engine: {0}")]
    Spawn(String),

    #[error("external engine exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("external engine timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("no JSON payload found in engine output")]
    NoPayload,

    #[error("I/O error: {0}")]
    Io(String),
}
