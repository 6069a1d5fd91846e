//! XMeld 1333 response parsing.
//!
//! Converts the registry's result message into the compact JSON document
//! web callers consume. Lookups match on local names because response
//! namespaces vary between registry deployments.

use meldgate_core::error::{Result, TransportError};
use roxmltree::Node;
use serde_json::{Value, json};

/// Parse an XMeld 1333 response into a JSON result.
///
/// An error report in the message header wins over any hit list; otherwise
/// every `treffer` element becomes one entry in the `treffer` array.
pub fn parse_response(xmeld_response: &str) -> Result<Value> {
    let doc = roxmltree::Document::parse(xmeld_response)
        .map_err(|e| TransportError::ResponseParse(e.to_string()))?;
    let root = doc.root_element();

    if let Some(error) = find_descendant(root, "fehlermeldung") {
        return Ok(json!({
            "status": "ERROR",
            "error": {
                "code": deep_text(error, "code"),
                "message": deep_text(error, "text"),
            },
        }));
    }

    let hits: Vec<Value> = root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "treffer")
        .map(parse_hit)
        .collect();

    Ok(json!({
        "status": "SUCCESS",
        "trefferAnzahl": hits.len(),
        "treffer": hits,
        "rawXml": xmeld_response,
    }))
}

fn parse_hit(hit: Node) -> Value {
    json!({
        "nachname": nested_text(hit, "familienname", "name"),
        "vorname": nested_text(hit, "vornamen", "name"),
        "strasse": deep_text(hit, "strasse"),
        "hausnummer": deep_text(hit, "hausnummer"),
        "plz": deep_text(hit, "postleitzahl"),
        "ort": deep_text(hit, "ort"),
        "ags": deep_text(hit, "gemeindeschluessel"),
        "wohnungStatus": deep_text(hit, "statusWohnung"),
    })
}

fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

/// Text of the first descendant with the given local name, or "".
fn deep_text(node: Node, local_name: &str) -> String {
    find_descendant(node, local_name)
        .and_then(|n| n.text())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Text found under `<parent>…<child>value</child>…</parent>`.
fn nested_text(node: Node, parent: &str, child: &str) -> String {
    find_descendant(node, parent)
        .map(|p| deep_text(p, child))
        .unwrap_or_default()
}
