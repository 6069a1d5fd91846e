//! Shared section builders.
//!
//! Every section is a pure function returning its rendered string; the
//! assemblers collect sections in their fixed order and join them once.
//! The reader/author header and address blocks are fixture data, identical
//! for both variants apart from the organization identifiers in the
//! variant table.

use meldgate_core::query::Address;

use crate::variant::{NS_XMELD, NS_XSI, VariantSpec, XMELD_STANDARD, XMELD_VERSION};

/// Fixture postal address used for the reader and author blocks. The same
/// building data serves both variants.
const STATION_BUILDING: &str = "<gebaeude><hausnummer>1</hausnummer><postleitzahl>80000</postleitzahl><strasse>Teststraße</strasse><wohnort>München</wohnort></gebaeude>";

/// Escape a caller-supplied value for use in element content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn xml_declaration() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string()
}

pub fn envelope_open(spec: &VariantSpec) -> String {
    format!(
        "<{root}\n    xmlns:xmeld=\"{NS_XMELD}\"\n    xmlns:xsi=\"{NS_XSI}\"\n    version=\"{XMELD_VERSION}\"\n    standard=\"{XMELD_STANDARD}\">",
        root = spec.root_element
    )
}

pub fn envelope_close(spec: &VariantSpec) -> String {
    format!("</{}>", spec.root_element)
}

/// The `nachrichtenkopf.g2g` block: message identification plus the fixed
/// reader and author identities from the variant table.
pub fn message_header(spec: &VariantSpec) -> String {
    format!(
        r#"    <nachrichtenkopf.g2g>
        <identifikation.nachricht>
            <nachrichtenUUID>{uuid}</nachrichtenUUID>
            <nachrichtentyp><code>{code}</code></nachrichtentyp>
            <erstellungszeitpunkt>{created_at}</erstellungszeitpunkt>
        </identifikation.nachricht>
        <leser>
            <verzeichnisdienst listVersionID="{reader_lv}"><code>{reader_ds}</code></verzeichnisdienst>
            <kennung>{reader_ident}</kennung>
            <name>{reader_name}</name>
        </leser>
        <autor>
            <verzeichnisdienst listVersionID="{author_lv}"><code>{author_ds}</code></verzeichnisdienst>
            <kennung>{author_ident}</kennung>
            <name>{author_name}</name>
        </autor>
    </nachrichtenkopf.g2g>"#,
        uuid = spec.message_uuid,
        code = spec.code,
        created_at = spec.created_at,
        reader_lv = spec.reader.list_version,
        reader_ds = spec.reader.directory_service,
        reader_ident = spec.reader.ident,
        reader_name = spec.reader.name,
        author_lv = spec.author.list_version,
        author_ds = spec.author.directory_service,
        author_ident = spec.author.ident,
        author_name = spec.author.name,
    )
}

pub fn reader_address() -> String {
    format!("    <anschrift.leser>{STATION_BUILDING}</anschrift.leser>")
}

pub fn author_address() -> String {
    format!("    <anschrift.autor>{STATION_BUILDING}</anschrift.autor>")
}

/// The requesting-party block (`datenAbrufendeStelle`).
pub fn requesting_party(spec: &VariantSpec) -> String {
    format!(
        r#"    <xmeld:datenAbrufendeStelle>
        <xmeld:sicherheitsbehoerde>false</xmeld:sicherheitsbehoerde>
        <xmeld:abrufberechtigteStelle>
            <xmeld:anschrift>{building}</xmeld:anschrift>
            <xmeld:behoerdenname>{authority}</xmeld:behoerdenname>
        </xmeld:abrufberechtigteStelle>
        <xmeld:aktenzeichen>{case_reference}</xmeld:aktenzeichen>
        <xmeld:anlassDesAbrufs>{reason}</xmeld:anlassDesAbrufs>
        <xmeld:kennung>{ident}</xmeld:kennung>
    </xmeld:datenAbrufendeStelle>"#,
        building = STATION_BUILDING,
        authority = spec.author.name,
        case_reference = spec.case_reference,
        reason = spec.request_reason,
        ident = spec.requester_ident,
    )
}

pub fn search_profile_open() -> String {
    "    <xmeld:suchprofil>\n        <xmeld:auswahldaten>".to_string()
}

pub fn search_profile_close() -> String {
    "        </xmeld:auswahldaten>\n    </xmeld:suchprofil>".to_string()
}

/// Nested name structure shared by both variants.
pub fn name_block(vorname: &str, nachname: &str) -> String {
    format!(
        r#"            <xmeld:name>
                <xmeld:name>
                    <xmeld:nachnameUndVornamen>
                        <xmeld:vornamen><name>{vorname}</name></xmeld:vornamen>
                        <xmeld:nachname><name>{nachname}</name></xmeld:nachname>
                    </xmeld:nachnameUndVornamen>
                </xmeld:name>
            </xmeld:name>"#,
        vorname = escape_xml(vorname),
        nachname = escape_xml(nachname),
    )
}

pub fn gender_block(code: &str) -> String {
    format!(
        "            <xmeld:geschlecht><code>{}</code></xmeld:geschlecht>",
        escape_xml(code)
    )
}

/// The subject's residence block (free search only). Only rendered when the
/// validator has proven the address complete; the nested house-number
/// structure appears iff a house number was supplied.
pub fn subject_address(address: &Address) -> String {
    let mut lines = vec![
        "            <xmeld:wohnung>".to_string(),
        "                <xmeld:anschrift>".to_string(),
        "                    <xmeld:anschrift.inland>".to_string(),
        format!(
            "                        <postleitzahl>{}</postleitzahl>",
            escape_xml(&address.plz)
        ),
        format!(
            "                        <strasse>{}</strasse>",
            escape_xml(&address.strasse)
        ),
        format!(
            "                        <wohnort>{}</wohnort>",
            escape_xml(&address.ort)
        ),
    ];
    if let Some(hausnummer) = &address.hausnummer {
        lines.push("                        <hausnummerOderHausnummernbereich>".to_string());
        lines.push(format!(
            "                            <hausnummer>{}</hausnummer>",
            escape_xml(hausnummer)
        ));
        if let Some(buchstabe) = &address.hausnummer_buchstabe {
            lines.push(format!(
                "                            <buchstabeHausnummer>{}</buchstabeHausnummer>",
                escape_xml(buchstabe)
            ));
        }
        if let Some(zusatz) = &address.hausnummer_zusatz {
            lines.push(format!(
                "                            <zusatzHausnummer>{}</zusatzHausnummer>",
                escape_xml(zusatz)
            ));
        }
        lines.push("                        </hausnummerOderHausnummernbereich>".to_string());
    }
    lines.push("                    </xmeld:anschrift.inland>".to_string());
    lines.push("                </xmeld:anschrift>".to_string());
    lines.push("            </xmeld:wohnung>".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{FREE_SEARCH, PERSON_SEARCH};

    #[test]
    fn escape_covers_the_five_markup_characters() {
        assert_eq!(
            escape_xml(r#"<Käthe & "Sohn's">"#),
            "&lt;Käthe &amp; &quot;Sohn&apos;s&quot;&gt;"
        );
    }

    #[test]
    fn envelope_declares_both_namespaces() {
        let open = envelope_open(&FREE_SEARCH);
        assert!(open.contains("xmlns:xmeld=\"http://www.osci.de/xmeld2511a\""));
        assert!(open.contains("xmlns:xsi="));
        assert!(open.contains("version=\"25.11a\""));
    }

    #[test]
    fn header_renders_variant_identity() {
        let header = message_header(&PERSON_SEARCH);
        assert!(header.contains("<code>1330</code>"));
        assert!(header.contains("ags:09162000"));
        assert!(header.contains(PERSON_SEARCH.message_uuid));
    }

    #[test]
    fn name_block_escapes_caller_values() {
        let block = name_block("Max & Moritz", "O'Brien");
        assert!(block.contains("Max &amp; Moritz"));
        assert!(block.contains("O&apos;Brien"));
    }

    #[test]
    fn subject_address_includes_house_number_structure_only_when_present() {
        let mut address = Address {
            plz: "80331".into(),
            strasse: "Marienplatz".into(),
            ort: "München".into(),
            hausnummer: None,
            hausnummer_buchstabe: None,
            hausnummer_zusatz: None,
        };
        assert!(!subject_address(&address).contains("hausnummerOderHausnummernbereich"));

        address.hausnummer = Some("8".into());
        address.hausnummer_buchstabe = Some("a".into());
        let block = subject_address(&address);
        assert!(block.contains("<hausnummer>8</hausnummer>"));
        assert!(block.contains("<buchstabeHausnummer>a</buchstabeHausnummer>"));
    }
}
