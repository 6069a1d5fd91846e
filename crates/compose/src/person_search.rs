//! Assembler for the structured person search request (message type 1330).
//!
//! Differs from the free search in its envelope and header identities, a
//! residence lookup keyed by municipality key and postal code instead of a
//! free-text address, a flat partially-known-date structure, and a
//! contiguous request-element range.

use meldgate_core::query::ValidatedQuery;

use crate::sections::{self, escape_xml};
use crate::variant::{PERSON_SEARCH, PERSON_SEARCH_RESIDENCE, person_search_codes};

/// Render the complete 1330 document.
///
/// `fragment` is the cleaned splice text from the fragment validator; it is
/// inserted right after the residence lookup block.
pub fn assemble(query: &ValidatedQuery, fragment: Option<&str>) -> String {
    let spec = &PERSON_SEARCH;
    let gemeindeschluessel = query
        .gemeindeschluessel
        .as_deref()
        .unwrap_or(PERSON_SEARCH_RESIDENCE.gemeindeschluessel);
    let postleitzahl = query
        .address
        .as_ref()
        .map(|a| a.plz.as_str())
        .unwrap_or(PERSON_SEARCH_RESIDENCE.postleitzahl);

    let mut parts = vec![
        sections::xml_declaration(),
        sections::envelope_open(spec),
        sections::message_header(spec),
        sections::reader_address(),
        sections::author_address(),
        sections::requesting_party(spec),
        sections::search_profile_open(),
        sections::name_block(&query.vorname, &query.nachname),
        residence_block(gemeindeschluessel, postleitzahl),
    ];
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

/// Residence lookup keyed by municipality key and postal code. Both values
/// fall back to fixed defaults when the caller supplies none.
fn residence_block(gemeindeschluessel: &str, postleitzahl: &str) -> String {
    format!(
        r#"            <xmeld:wohnort>
                <gemeindeschluessel>{g}</gemeindeschluessel>
                <postleitzahl>{p}</postleitzahl>
            </xmeld:wohnort>"#,
        g = escape_xml(gemeindeschluessel),
        p = escape_xml(postleitzahl),
    )
}

/// Birth date in the flat partially-known-date structure, intentionally
/// not the nested form the free search renders.
fn birth_date_block(geburtsdatum: &str) -> String {
    format!(
        r#"            <xmeld:geburtsdatum>
                <teilbekanntesDatum>
                    <jahrMonatTag>{geburtsdatum}</jahrMonatTag>
                </teilbekanntesDatum>
            </xmeld:geburtsdatum>"#
    )
}

/// Control block: the contiguous request-element range plus the
/// waive-notification flag.
fn control_block() -> String {
    let mut lines = vec!["    <xmeld:steuerungsinformationen>".to_string()];
    for code in person_search_codes() {
        lines.push(format!(
            "        <xmeld:anforderungselement><code>{code}</code></xmeld:anforderungselement>"
        ));
    }
    lines.push("        <xmeld:verzichtAufMitteilung>true</xmeld:verzichtAufMitteilung>".to_string());
    lines.push("    </xmeld:steuerungsinformationen>".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use meldgate_core::MessageType;
    use meldgate_core::query::Address;

    fn query() -> ValidatedQuery {
        ValidatedQuery {
            message_type: MessageType::PersonSearch,
            vorname: "Erika".into(),
            nachname: "Musterfrau".into(),
            geburtsdatum: "1985".into(),
            geschlecht: None,
            address: None,
            gemeindeschluessel: None,
            custom_xml: None,
        }
    }

    #[test]
    fn document_opens_and_closes_the_1330_envelope() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<xmeld:datenabruf.personensuche.suchanfrage.1330"));
        assert!(doc.ends_with("</xmeld:datenabruf.personensuche.suchanfrage.1330>"));
        assert!(doc.contains("<code>1330</code>"));
    }

    #[test]
    fn residence_lookup_defaults_when_absent() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<gemeindeschluessel>09000009</gemeindeschluessel>"));
        assert!(doc.contains("<postleitzahl>80331</postleitzahl>"));
    }

    #[test]
    fn residence_lookup_uses_caller_values() {
        let mut q = query();
        q.gemeindeschluessel = Some("09162000".into());
        q.address = Some(Address {
            plz: "80469".into(),
            strasse: "Fraunhoferstraße".into(),
            ort: "München".into(),
            hausnummer: None,
            hausnummer_buchstabe: None,
            hausnummer_zusatz: None,
        });
        let doc = assemble(&q, None);
        assert!(doc.contains("<gemeindeschluessel>09162000</gemeindeschluessel>"));
        assert!(doc.contains("<postleitzahl>80469</postleitzahl>"));
        // The free-text address block never appears in a person search.
        assert!(!doc.contains("<xmeld:wohnung>"));
    }

    #[test]
    fn birth_date_uses_the_flat_structure() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<xmeld:geburtsdatum>\n                <teilbekanntesDatum>"));
        assert!(!doc.contains("<xmeld:geburtsdaten>"));
        assert!(doc.contains("<jahrMonatTag>1985</jahrMonatTag>"));
    }

    #[test]
    fn gender_defaults_to_m() {
        let doc = assemble(&query(), None);
        assert!(doc.contains("<xmeld:geschlecht><code>m</code></xmeld:geschlecht>"));
    }

    #[test]
    fn control_block_is_the_full_contiguous_range() {
        let doc = assemble(&query(), None);
        assert_eq!(doc.matches("<xmeld:anforderungselement>").count(), 185);
        assert!(doc.contains("<code>185</code>"));
        assert!(!doc.contains("<code>186</code>"));
    }

    #[test]
    fn fragment_is_spliced_after_the_residence_lookup() {
        let doc = assemble(&query(), Some("            <foo>bar</foo>"));
        let residence = doc.find("</xmeld:wohnort>").expect("residence present");
        let splice = doc.find("<foo>bar</foo>").expect("fragment present");
        let birth = doc.find("<xmeld:geburtsdatum>").expect("birth date present");
        assert!(residence < splice);
        assert!(splice < birth);
    }
}
