//! `Authorization: Basic` credential decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// An `email:password` pair taken from a Basic authorization header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl BasicCredentials {
    /// Decode a header value such as `Basic Ym9iQGR5bGFuLmNvbTp0b3RvMTIzNCE=`.
    ///
    /// Returns `None` for any other scheme, invalid base64, non UTF-8
    /// content, or a payload without a `:` separator. The password may
    /// itself contain `:`.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (email, password) = decoded.split_once(':')?;
        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode as a header value.
    pub fn to_header(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.email, self.password))
        )
    }
}
