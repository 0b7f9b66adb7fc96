//! Distinguished name handling
//!
//! Names compare by their DER encoding, which is what issuer/subject chaining
//! matches on. The RFC 4514 rendering and the extracted attributes are for
//! display and lookup by humans only.

use std::fmt;
use std::hash::{Hash, Hasher};

use der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use der::Encode;
use x509_cert::name::Name;

use crate::error::{CertificateError, Result};

/// An X.509 distinguished name, keyed by its DER encoding
#[derive(Clone)]
pub struct DistinguishedName {
    der: Vec<u8>,
    rendered: String,
    attributes: Vec<(String, String)>,
}

impl DistinguishedName {
    pub(crate) fn from_name(name: &Name) -> Result<Self> {
        let der = name
            .to_der()
            .map_err(|e| CertificateError::parse(format!("Failed to encode name: {e}")))?;

        Ok(Self {
            der,
            rendered: name.to_string(),
            attributes: extract_name_attributes(name),
        })
    }

    /// DER encoding of the name
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// First value for a short attribute name (`CN`, `O`, `OU`, `C`, `ST`, `L`)
    #[must_use]
    pub fn attribute(&self, short_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == short_name)
            .map(|(_, value)| value.as_str())
    }

    /// The `CN` attribute
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.attribute("CN")
    }

    /// All recognised attributes in name order
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for DistinguishedName {}

impl Hash for DistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.der.hash(state);
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl fmt::Debug for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DistinguishedName({})", self.rendered)
    }
}

/// Extract the common attributes from an x509-cert `Name`
fn extract_name_attributes(name: &Name) -> Vec<(String, String)> {
    const OID_CN: &str = "2.5.4.3";
    const OID_O: &str = "2.5.4.10";
    const OID_OU: &str = "2.5.4.11";
    const OID_C: &str = "2.5.4.6";
    const OID_ST: &str = "2.5.4.8";
    const OID_L: &str = "2.5.4.7";

    let mut attributes = Vec::new();

    for rdn in &name.0 {
        for atv in rdn.0.iter() {
            let short_name = match atv.oid.to_string().as_str() {
                OID_CN => "CN",
                OID_O => "O",
                OID_OU => "OU",
                OID_C => "C",
                OID_ST => "ST",
                OID_L => "L",
                _ => continue,
            };

            // Directory strings show up in any of these encodings
            let value = if let Ok(ps) = PrintableStringRef::try_from(&atv.value) {
                ps.to_string()
            } else if let Ok(utf8s) = Utf8StringRef::try_from(&atv.value) {
                utf8s.to_string()
            } else if let Ok(ia5s) = Ia5StringRef::try_from(&atv.value) {
                ia5s.to_string()
            } else {
                continue;
            };

            attributes.push((short_name.to_string(), value));
        }
    }

    attributes
}
