//! Query domain types: raw input, normalization, field-group validation.
//!
//! `QueryInput` is what callers send (gateway JSON body, CLI flags); its
//! field names mirror the web form of the registry test interface.
//! Normalization trims values and collapses empty strings to `None`; it
//! never fails. Validation either produces a fully-typed [`ValidatedQuery`]
//! or a structured failure; nothing partially validated ever reaches the
//! assemblers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ValidationError};

/// The two supported XMeld request variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Free-text search (message type 1332). The default variant.
    #[default]
    FreeSearch,
    /// Structured person search (message type 1330).
    PersonSearch,
}

impl MessageType {
    /// Message type codes accepted by the validator.
    pub const ALLOWED: [&'static str; 2] = ["1332", "1330"];

    /// The message type code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            MessageType::FreeSearch => "1332",
            MessageType::PersonSearch => "1330",
        }
    }

    /// Resolve a declared selector. An absent selector falls back to the
    /// default variant; anything other than the two known codes is rejected.
    pub fn resolve(declared: Option<&str>) -> Result<Self> {
        match declared {
            None => Ok(MessageType::FreeSearch),
            Some("1332") => Ok(MessageType::FreeSearch),
            Some("1330") => Ok(MessageType::PersonSearch),
            Some(other) => Err(ValidationError::UnsupportedMessageType {
                declared: other.to_string(),
                allowed: Self::ALLOWED.to_vec(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw search input as received from callers. Missing keys are allowed
/// everywhere; nothing is validated at this stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryInput {
    #[serde(rename = "messageType")]
    pub message_type: Option<String>,
    pub vorname: Option<String>,
    pub nachname: Option<String>,
    pub geburtsdatum: Option<String>,
    pub geschlecht: Option<String>,
    pub strasse: Option<String>,
    pub hausnummer: Option<String>,
    #[serde(rename = "hausnummerBuchstabe")]
    pub hausnummer_buchstabe: Option<String>,
    #[serde(rename = "hausnummerZusatz")]
    pub hausnummer_zusatz: Option<String>,
    pub plz: Option<String>,
    pub ort: Option<String>,
    pub gemeindeschluessel: Option<String>,
    #[serde(rename = "customXml")]
    pub custom_xml: Option<String>,
}

/// A normalized query: every value trimmed, empty values collapsed to
/// `None`, so "absent" and "empty string" are the same thing from here on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub message_type: Option<String>,
    pub vorname: Option<String>,
    pub nachname: Option<String>,
    pub geburtsdatum: Option<String>,
    pub geschlecht: Option<String>,
    pub address: AddressInput,
    pub gemeindeschluessel: Option<String>,
    pub custom_xml: Option<String>,
}

/// The subject's address sub-fields before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub strasse: Option<String>,
    pub hausnummer: Option<String>,
    pub hausnummer_buchstabe: Option<String>,
    pub hausnummer_zusatz: Option<String>,
    pub plz: Option<String>,
    pub ort: Option<String>,
}

impl AddressInput {
    fn any_present(&self) -> bool {
        self.strasse.is_some()
            || self.hausnummer.is_some()
            || self.hausnummer_buchstabe.is_some()
            || self.hausnummer_zusatz.is_some()
            || self.plz.is_some()
            || self.ort.is_some()
    }
}

/// A complete subject address. Invariant: postal code, street, and town are
/// always present together; the house number structure is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub plz: String,
    pub strasse: String,
    pub ort: String,
    pub hausnummer: Option<String>,
    pub hausnummer_buchstabe: Option<String>,
    pub hausnummer_zusatz: Option<String>,
}

/// The validated, fully-typed query handed to the assemblers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub message_type: MessageType,
    pub vorname: String,
    pub nachname: String,
    /// Opaque partial-date string, passed through verbatim.
    pub geburtsdatum: String,
    /// Gender code; the variant supplies its default when absent.
    pub geschlecht: Option<String>,
    pub address: Option<Address>,
    /// Municipality key; used only by the person search variant.
    pub gemeindeschluessel: Option<String>,
    /// Raw custom fragment, not yet checked for well-formedness.
    pub custom_xml: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl QueryRequest {
    /// Normalize raw caller input. This stage never fails.
    pub fn normalize(input: QueryInput) -> Self {
        Self {
            message_type: clean(input.message_type),
            vorname: clean(input.vorname),
            nachname: clean(input.nachname),
            geburtsdatum: clean(input.geburtsdatum),
            geschlecht: clean(input.geschlecht),
            address: AddressInput {
                strasse: clean(input.strasse),
                hausnummer: clean(input.hausnummer),
                hausnummer_buchstabe: clean(input.hausnummer_buchstabe),
                hausnummer_zusatz: clean(input.hausnummer_zusatz),
                plz: clean(input.plz),
                ort: clean(input.ort),
            },
            gemeindeschluessel: clean(input.gemeindeschluessel),
            custom_xml: clean(input.custom_xml),
        }
    }

    /// Enforce message-type admissibility and the address all-or-nothing
    /// rule. The custom fragment is not touched here; the composition
    /// engine checks it separately.
    pub fn validate(self) -> Result<ValidatedQuery> {
        let message_type = MessageType::resolve(self.message_type.as_deref())?;

        // Name and birth date carry no default; an empty value here is a
        // contract violation, not a recoverable input error.
        let vorname = self.vorname.ok_or(Error::Contract { field: "vorname" })?;
        let nachname = self.nachname.ok_or(Error::Contract { field: "nachname" })?;
        let geburtsdatum = self
            .geburtsdatum
            .ok_or(Error::Contract { field: "geburtsdatum" })?;

        let address = validate_address(self.address)?;

        Ok(ValidatedQuery {
            message_type,
            vorname,
            nachname,
            geburtsdatum,
            geschlecht: self.geschlecht,
            address,
            gemeindeschluessel: self.gemeindeschluessel,
            custom_xml: self.custom_xml,
        })
    }
}

/// All-or-nothing address rule: either every address sub-field is absent,
/// or plz, strasse, and ort are all present. The missing-field list is
/// stable-ordered for reproducible caller messages.
fn validate_address(input: AddressInput) -> Result<Option<Address>> {
    if !input.any_present() {
        return Ok(None);
    }

    match (input.plz, input.strasse, input.ort) {
        (Some(plz), Some(strasse), Some(ort)) => Ok(Some(Address {
            plz,
            strasse,
            ort,
            hausnummer: input.hausnummer,
            hausnummer_buchstabe: input.hausnummer_buchstabe,
            hausnummer_zusatz: input.hausnummer_zusatz,
        })),
        (plz, strasse, ort) => {
            let mut missing = Vec::new();
            if plz.is_none() {
                missing.push("plz");
            }
            if strasse.is_none() {
                missing.push("strasse");
            }
            if ort.is_none() {
                missing.push("ort");
            }
            Err(ValidationError::IncompleteAddress { missing }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> QueryInput {
        QueryInput {
            vorname: Some("Max".into()),
            nachname: Some("Mustermann".into()),
            geburtsdatum: Some("1990-05-17".into()),
            ..QueryInput::default()
        }
    }

    #[test]
    fn normalize_trims_and_collapses_empty() {
        let input = QueryInput {
            vorname: Some("  Max ".into()),
            nachname: Some("".into()),
            ort: Some("   ".into()),
            ..QueryInput::default()
        };
        let request = QueryRequest::normalize(input);
        assert_eq!(request.vorname.as_deref(), Some("Max"));
        assert_eq!(request.nachname, None);
        assert_eq!(request.address.ort, None);
    }

    #[test]
    fn missing_message_type_defaults_to_free_search() {
        let query = QueryRequest::normalize(minimal_input()).validate().unwrap();
        assert_eq!(query.message_type, MessageType::FreeSearch);
    }

    #[test]
    fn person_search_selector_resolves() {
        let mut input = minimal_input();
        input.message_type = Some("1330".into());
        let query = QueryRequest::normalize(input).validate().unwrap();
        assert_eq!(query.message_type, MessageType::PersonSearch);
    }

    #[test]
    fn unknown_message_type_is_rejected_with_allowed_set() {
        let mut input = minimal_input();
        input.message_type = Some("9999".into());
        let err = QueryRequest::normalize(input).validate().unwrap_err();
        match err {
            Error::Validation(ValidationError::UnsupportedMessageType { declared, allowed }) => {
                assert_eq!(declared, "9999");
                assert_eq!(allowed, vec!["1332", "1330"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_address_group_is_omitted() {
        let query = QueryRequest::normalize(minimal_input()).validate().unwrap();
        assert_eq!(query.address, None);
    }

    #[test]
    fn partial_address_lists_exactly_the_missing_trio_fields() {
        let mut input = minimal_input();
        input.plz = Some("80331".into());
        let err = QueryRequest::normalize(input).validate().unwrap_err();
        match err {
            Error::Validation(ValidationError::IncompleteAddress { missing }) => {
                assert_eq!(missing, vec!["strasse", "ort"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn house_number_alone_reports_all_three_required_fields() {
        let mut input = minimal_input();
        input.hausnummer = Some("12".into());
        let err = QueryRequest::normalize(input).validate().unwrap_err();
        match err {
            Error::Validation(ValidationError::IncompleteAddress { missing }) => {
                assert_eq!(missing, vec!["plz", "strasse", "ort"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn complete_address_passes_through() {
        let mut input = minimal_input();
        input.plz = Some("80331".into());
        input.strasse = Some("Marienplatz".into());
        input.ort = Some("München".into());
        input.hausnummer = Some("8".into());
        let query = QueryRequest::normalize(input).validate().unwrap();
        let address = query.address.expect("address should be complete");
        assert_eq!(address.plz, "80331");
        assert_eq!(address.hausnummer.as_deref(), Some("8"));
    }

    #[test]
    fn missing_name_is_a_contract_violation() {
        let input = QueryInput {
            nachname: Some("Mustermann".into()),
            geburtsdatum: Some("1990".into()),
            ..QueryInput::default()
        };
        let err = QueryRequest::normalize(input).validate().unwrap_err();
        assert!(matches!(err, Error::Contract { field: "vorname" }));
    }

    #[test]
    fn query_input_deserializes_from_form_keys() {
        let json = r#"{
            "messageType": "1332",
            "vorname": "Erika",
            "nachname": "Musterfrau",
            "geburtsdatum": "1985",
            "hausnummerBuchstabe": "a",
            "customXml": "<foo/>"
        }"#;
        let input: QueryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.vorname.as_deref(), Some("Erika"));
        assert_eq!(input.hausnummer_buchstabe.as_deref(), Some("a"));
        assert_eq!(input.custom_xml.as_deref(), Some("<foo/>"));
    }
}
