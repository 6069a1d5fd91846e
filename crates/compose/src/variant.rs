//! Variant constant tables.
//!
//! Each message type carries a fixed envelope: root element name, header
//! fixture identities, requesting-party block, per-variant defaults, and a
//! control-code list. The tables are immutable constant data, initialized
//! at compile time and never written to afterward.
//!
//! Document identifiers and creation timestamps are fixed fixture values
//! rather than generated per call, so identical input renders
//! byte-identical output.

use meldgate_core::MessageType;

/// XMeld namespace bound to the `xmeld` prefix.
pub const NS_XMELD: &str = "http://www.osci.de/xmeld2511a";

/// XML Schema instance namespace bound to the `xsi` prefix.
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Standard version attributes on the envelope root.
pub const XMELD_VERSION: &str = "25.11a";
pub const XMELD_STANDARD: &str = "XMeld";

/// Organization identity in the message header (`leser`/`autor`).
#[derive(Debug, Clone, Copy)]
pub struct PartyIdent {
    pub directory_service: &'static str,
    pub list_version: &'static str,
    pub ident: &'static str,
    pub name: &'static str,
}

/// The full constant table for one message variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantSpec {
    pub message_type: MessageType,
    /// Message type code rendered into the header.
    pub code: &'static str,
    /// Qualified root element name of the envelope.
    pub root_element: &'static str,
    /// Fixed-fixture document identifier.
    pub message_uuid: &'static str,
    /// Fixed-fixture creation timestamp.
    pub created_at: &'static str,
    pub reader: PartyIdent,
    pub author: PartyIdent,
    /// `aktenzeichen` in the requesting-party block.
    pub case_reference: &'static str,
    /// `anlassDesAbrufs` in the requesting-party block.
    pub request_reason: &'static str,
    /// `kennung` in the requesting-party block.
    pub requester_ident: &'static str,
    /// Gender code used when the caller supplies none.
    pub default_gender: &'static str,
}

pub const FREE_SEARCH: VariantSpec = VariantSpec {
    message_type: MessageType::FreeSearch,
    code: "1332",
    root_element: "xmeld:datenabruf.freieSuche.suchanfrage.1332",
    message_uuid: "7b0c2f5e-8d41-4a9b-b6a3-9f1e6c2d0a11",
    created_at: "2024-01-15T10:30:00+01:00",
    reader: PartyIdent {
        directory_service: "DVDV",
        list_version: "3",
        ident: "ags:09000009",
        name: "Test Municipality",
    },
    author: PartyIdent {
        directory_service: "DVDV",
        list_version: "3",
        ident: "dbs:060030010000",
        name: "Test Authority",
    },
    case_reference: "WEB-TEST",
    request_reason: "Web Interface Test",
    requester_ident: "web/test",
    default_gender: "w",
};

pub const PERSON_SEARCH: VariantSpec = VariantSpec {
    message_type: MessageType::PersonSearch,
    code: "1330",
    root_element: "xmeld:datenabruf.personensuche.suchanfrage.1330",
    message_uuid: "3e6f1a29-4c87-4d02-9b15-8a2d7e4f0c30",
    created_at: "2024-02-01T09:00:00+01:00",
    reader: PartyIdent {
        directory_service: "DVDV",
        list_version: "3",
        ident: "ags:09162000",
        name: "Test City Registry",
    },
    author: PartyIdent {
        directory_service: "DVDV",
        list_version: "3",
        ident: "dbs:060030020000",
        name: "Test State Authority",
    },
    case_reference: "API-TEST",
    request_reason: "Automated Person Search",
    requester_ident: "api/test",
    default_gender: "m",
};

/// Request-element codes for the free search: a fixed 15-entry list.
pub const FREE_SEARCH_CODES: [u16; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 29, 33, 34, 35, 37];

/// Regional search-scope code appended to the free-search control block.
pub const FREE_SEARCH_SCOPE: &str = "09";

/// Upper bound of the person search's contiguous request-element range.
pub const PERSON_SEARCH_CODE_COUNT: u16 = 185;

/// Request-element codes for the person search: the range 1..=185.
pub fn person_search_codes() -> impl Iterator<Item = u16> {
    1..=PERSON_SEARCH_CODE_COUNT
}

/// Fallback residence lookup values for the person search.
#[derive(Debug, Clone, Copy)]
pub struct ResidenceDefaults {
    pub gemeindeschluessel: &'static str,
    pub postleitzahl: &'static str,
}

pub const PERSON_SEARCH_RESIDENCE: ResidenceDefaults = ResidenceDefaults {
    gemeindeschluessel: "09000009",
    postleitzahl: "80331",
};

/// Look up the constant table for a message type.
pub fn spec_for(message_type: MessageType) -> &'static VariantSpec {
    match message_type {
        MessageType::FreeSearch => &FREE_SEARCH,
        MessageType::PersonSearch => &PERSON_SEARCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_search_code_list_has_fifteen_entries() {
        assert_eq!(FREE_SEARCH_CODES.len(), 15);
    }

    #[test]
    fn person_search_range_is_contiguous() {
        let codes: Vec<u16> = person_search_codes().collect();
        assert_eq!(codes.len(), 185);
        assert_eq!(codes.first(), Some(&1));
        assert_eq!(codes.last(), Some(&185));
        assert!(codes.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn variants_carry_distinct_fixtures() {
        assert_ne!(FREE_SEARCH.root_element, PERSON_SEARCH.root_element);
        assert_ne!(FREE_SEARCH.message_uuid, PERSON_SEARCH.message_uuid);
        assert_ne!(FREE_SEARCH.reader.ident, PERSON_SEARCH.reader.ident);
        assert_ne!(FREE_SEARCH.author.ident, PERSON_SEARCH.author.ident);
    }

    #[test]
    fn spec_lookup_matches_message_type() {
        assert_eq!(spec_for(MessageType::FreeSearch).code, "1332");
        assert_eq!(spec_for(MessageType::PersonSearch).code, "1330");
    }
}
