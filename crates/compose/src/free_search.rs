//! Assembler for the free-text search request (message type 1332).

use meldgate_core::query::ValidatedQuery;

use crate::sections;
use crate::variant::{FREE_SEARCH, FREE_SEARCH_CODES, FREE_SEARCH_SCOPE};

/// Render the complete 1332 document.
///
/// `fragment` is the cleaned splice text from the fragment validator; it is
/// inserted right before the birth-date block.
pub fn assemble(query: &ValidatedQuery, fragment: Option<&str>) -> String {
    let spec = &FREE_SEARCH;
    let mut parts = vec![
        sections::xml_declaration(),
        sections::envelope_open(spec),
        sections::message_header(spec),
        sections::reader_address(),
        sections::author_address(),
        sections::requesting_party(spec),
        sections::search_profile_open(),
        sections::name_block(&query.vorname, &query.nachname),
    ];
    if let Some(address) = &query.address {
        parts.push(sections::subject_address(address));
    }
    if let Some(fragment) = fragment {
        parts.push(fragment.to_string());
    }
    parts.push(birth_date_block(&query.geburtsdatum));
    parts.push(sections::gender_block(
        query.geschlecht.as_deref().unwrap_or(spec.default_gender),
    ));
    parts.push(sections::search_profile_close());
    parts.push(control_block());
    parts.push(sections::envelope_close(spec));
    parts.join("\n")
}

/// Birth date in the nested partially-known-date structure. The literal
/// date string is passed through verbatim; partial dates stay partial.
fn birth_date_block(geburtsdatum: &str) -> String {
    format!(
        r#"            <xmeld:geburtsdaten>
                <xmeld:geburtstag>
                    <xmeld:geburtsdatum>
                        <xmeld:geburtsdatum>
                            <teilbekanntesDatum>
                                <jahrMonatTag>{geburtsdatum}</jahrMonatTag>
                            </teilbekanntesDatum>
                        </xmeld:geburtsdatum>
                    </xmeld:geburtsdatum>
                </xmeld:geburtstag>
            </xmeld:geburtsdaten>"#
    )
}

/// Control block: the fixed 15-entry request-element list, the
/// waive-notification flag, and the regional search scope.
fn control_block() -> String {
    let mut lines = vec!["    <xmeld:steuerungsinformationen>".to_string()];
    for code in FREE_SEARCH_CODES {
        lines.push(format!(
            "        <xmeld:anforderungselement><code>{code}</code></xmeld:anforderungselement>"
        ));
    }
    lines.push("        <xmeld:verzichtAufMitteilung>true</xmeld:verzichtAufMitteilung>".to_string());
    lines.push(format!(
        "        <xmeld:suchraum><code>{FREE_SEARCH_SCOPE}</code></xmeld:suchraum>"
    ));
    lines.push("    </xmeld:steuerungsinformationen>".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use meldgate_core::MessageType;

    fn query() -> ValidatedQuery {
        ValidatedQuery {
            message_type: MessageType::FreeSearch,
            vorname: "Max".into(),
            nachname: "Mustermann".into(),
            geburtsdatum: "1990-05-17".into(),
            geschlecht: None,
            address: None,
            gemeindeschluessel: None,
            custom_xml: None,
        }
    }

    #[test]
    fn document_opens_and_closes_the_1332_envelope() {
        let doc = assemble(&query(), None);
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<xmeld:datenabruf.freieSuche.suchanfrage.1332"));
        assert!(doc.ends_with("</xmeld:datenabruf.freieSuche.suchanfrage.1332>"));
    }

    #[test]
    fn gender_defaults_to_w() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<xmeld:geschlecht><code>w</code></xmeld:geschlecht>"));
    }

    #[test]
    fn explicit_gender_wins_over_default() {
        let mut q = query();
        q.geschlecht = Some("m".into());
        let doc = assemble(&q, None);
        assert!(doc.contains("<code>m</code></xmeld:geschlecht>"));
    }

    #[test]
    fn birth_date_uses_the_nested_structure() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<xmeld:geburtsdaten>"));
        assert!(doc.contains("<jahrMonatTag>1990-05-17</jahrMonatTag>"));
    }

    #[test]
    fn control_block_carries_scope_and_waiver() {
        let doc = assemble(&query(), None);
        assert_eq!(doc.matches("<xmeld:anforderungselement>").count(), 15);
        assert!(doc.contains("<xmeld:verzichtAufMitteilung>true</xmeld:verzichtAufMitteilung>"));
        assert!(doc.contains("<xmeld:suchraum><code>09</code></xmeld:suchraum>"));
    }

    #[test]
    fn fragment_is_spliced_before_the_birth_date() {
        let doc = assemble(&query(), Some("            <foo>bar</foo>"));
        let splice = doc.find("<foo>bar</foo>").expect("fragment present");
        let birth = doc.find("<xmeld:geburtsdaten>").expect("birth date present");
        let name = doc.find("</xmeld:name>").expect("name block present");
        assert!(name < splice);
        assert!(splice < birth);
    }
}
