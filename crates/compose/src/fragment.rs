//! Custom fragment validation and cleanup.
//!
//! Callers may supply a raw XML snippet that is spliced into the search
//! profile. The snippet is checked for well-formedness inside a synthetic
//! wrapper that declares every namespace prefix the two envelopes use, so a
//! fragment like `<xmeld:geschlecht>…</xmeld:geschlecht>` parses in
//! isolation. Accepted fragments are re-indented so the splice point looks
//! the same regardless of the caller's original formatting.
//!
//! Well-formedness only: the fragment is deliberately not checked against
//! the XMeld schema.

use meldgate_core::error::FragmentError;

use crate::variant::{NS_XMELD, NS_XSI};

/// Indentation applied to every spliced line (the depth of the selection
/// data inside the search profile).
pub(crate) const SPLICE_INDENT: &str = "            ";

/// Validate a caller-supplied fragment and normalize it for splicing.
///
/// The input is expected to be non-empty; the normalizer collapses empty
/// and whitespace-only fragments to `None` before this point.
pub fn prepare(fragment: &str) -> Result<String, FragmentError> {
    if !fragment.trim_start().starts_with('<') {
        return Err(FragmentError::StartsWithText);
    }

    let wrapped = format!(
        "<wrapper xmlns:xmeld=\"{NS_XMELD}\" xmlns:xsi=\"{NS_XSI}\">{fragment}</wrapper>"
    );
    roxmltree::Document::parse(&wrapped).map_err(|e| FragmentError::Malformed(e.to_string()))?;

    Ok(reindent(fragment))
}

/// Drop whitespace-only lines, trim the rest, and re-indent uniformly.
fn reindent(fragment: &str) -> String {
    fragment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{SPLICE_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
