//! SOAP client for the registry's XoevService endpoint.
//!
//! The rendered XMeld document travels Base64-encoded inside a
//! `callApplicationByte` call; the 1333 response comes back the same way
//! and is decoded before parsing. Request and response documents are only
//! ever logged through the PII masker.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use meldgate_core::error::{Error, Result, TransportError};
use tracing::{debug, info};

use crate::mask::PiiMasker;

/// Default integration endpoint of the registry service.
pub const DEFAULT_ENDPOINT: &str = "https://apk-int.akdb.de/okkommbis/services/XoevService";

/// Service namespace from the XoevService WSDL.
const SERVICE_NS: &str = "urn:akdb:ok.komm:xmeld-service";

pub struct SoapClient {
    endpoint: String,
    http: reqwest::Client,
    masker: PiiMasker,
}

impl SoapClient {
    /// Create a client for the given endpoint, falling back to the default
    /// integration endpoint.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            http,
            masker: PiiMasker::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a rendered XMeld document and return the decoded response XML.
    pub async fn send(&self, xmeld_xml: &str) -> Result<String> {
        info!(endpoint = %self.endpoint, "Sending XMeld request");
        debug!(request = %self.masker.mask(xmeld_xml), "Request document (masked)");

        let payload = BASE64.encode(xmeld_xml.as_bytes());
        let envelope = soap_envelope(&payload);

        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        if body.contains(":Fault>") || body.contains("<Fault>") {
            return Err(TransportError::SoapFault.into());
        }

        let encoded = extract_return_payload(&body)?;
        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|e| TransportError::PayloadDecode(e.to_string()))?;
        let xml =
            String::from_utf8(decoded).map_err(|e| TransportError::PayloadDecode(e.to_string()))?;

        debug!(response = %self.masker.mask(&xml), "Response document (masked)");
        Ok(xml)
    }
}

/// Wrap a Base64 payload in the `callApplicationByte` SOAP 1.1 envelope.
fn soap_envelope(payload: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\" xmlns:tns=\"{SERVICE_NS}\">\
         <soapenv:Header/>\
         <soapenv:Body>\
         <tns:callApplicationByte>\
         <tns:xmlParameter>{payload}</tns:xmlParameter>\
         </tns:callApplicationByte>\
         </soapenv:Body>\
         </soapenv:Envelope>"
    )
}

/// Extract the `callApplicationByteReturn` text from a SOAP response.
/// Matched by local name so prefix differences between deployments do not
/// break extraction.
fn extract_return_payload(soap_response: &str) -> Result<String> {
    let doc = roxmltree::Document::parse(soap_response)
        .map_err(|e| TransportError::ResponseParse(e.to_string()))?;
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "callApplicationByteReturn")
        .and_then(|n| n.text())
        .map(str::to_string)
        .ok_or_else(|| Error::from(TransportError::MissingReturnPayload))
}
