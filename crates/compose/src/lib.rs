//! # Meldgate Compose
//!
//! The XMeld message composition engine: variant constant tables, the
//! custom fragment validator, shared section builders, and the two document
//! assemblers.
//!
//! Composition is a linear pipeline; any failure short-circuits before
//! assembly:
//!
//! ```text
//! QueryInput → normalize → validate → fragment check → assemble
//! ```
//!
//! Every composition is a pure function of its input. The only shared state
//! is the variants' constant fixture tables, so calls may run concurrently
//! without coordination.

pub mod fragment;
pub mod free_search;
pub mod person_search;
pub mod sections;
pub mod variant;

use meldgate_core::error::Result;
use meldgate_core::query::{MessageType, QueryInput, QueryRequest, ValidatedQuery};
use tracing::debug;

pub use variant::{FREE_SEARCH, PERSON_SEARCH, VariantSpec, spec_for};

/// A document assembler: validated query plus optional cleaned fragment →
/// rendered document.
pub type Assembler = fn(&ValidatedQuery, Option<&str>) -> String;

/// Pure registry lookup with exactly two entries. Unsupported selectors
/// never reach this point; the validator rejects them first.
pub fn assembler_for(message_type: MessageType) -> Assembler {
    match message_type {
        MessageType::FreeSearch => free_search::assemble,
        MessageType::PersonSearch => person_search::assemble,
    }
}

/// Render the document for an already-validated query, checking the custom
/// fragment on the way.
pub fn compose(query: &ValidatedQuery) -> Result<String> {
    let cleaned = match query.custom_xml.as_deref() {
        Some(raw) => Some(fragment::prepare(raw)?),
        None => None,
    };
    let document = assembler_for(query.message_type)(query, cleaned.as_deref());
    debug!(
        message_type = %query.message_type,
        bytes = document.len(),
        "Composed request document"
    );
    Ok(document)
}

/// Run the full pipeline from raw caller input to rendered document.
pub fn compose_input(input: QueryInput) -> Result<String> {
    let query = QueryRequest::normalize(input).validate()?;
    compose(&query)
}
