//! # Request Signer - Canonical `x-ots-*` Header Signing
//!
//! ## Purpose
//!
//! Produces the authentication headers Tablestore expects on every RPC:
//!
//! ```text
//! string_to_sign = uri "\n" method "\n\n" { name ":" value "\n" }*
//! signature      = base64(HMAC-SHA1(access_key_secret, string_to_sign))
//! ```
//!
//! The header lines are the lowercase `x-ots-*` headers except
//! `x-ots-signature`, in ascending byte order of the name. The body is bound
//! to the signature through `x-ots-contentmd5`.
//!
//! Signing never fails on odd secrets or empty bodies; the server rejects bad
//! credentials with an error envelope.

use crate::{Result, TransportError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use std::collections::BTreeMap;
use std::fmt;
use tablestore_config::{headers, protocol, ClientConfig};

type HmacSha1 = Hmac<Sha1>;

/// Request headers keyed by lowercase name, iterated in byte order
pub type RequestHeaders = BTreeMap<String, String>;

/// Canonical string covering the uri, method and `x-ots-*` headers
pub fn string_to_sign(uri: &str, method: &str, request_headers: &RequestHeaders) -> String {
    let mut canonical: Vec<(String, &str)> = request_headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
        .filter(|(name, _)| name.starts_with(headers::PREFIX) && name != headers::SIGNATURE)
        .collect();
    canonical.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = format!("{uri}\n{method}\n\n");
    for (name, value) in canonical {
        out.push_str(&name);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// base64(HMAC-SHA1(secret, string_to_sign))
pub fn sign(secret: &str, string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| TransportError::security(format!("HMAC key rejected: {e}")))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// base64 MD5 digest of the exact request body
pub fn content_md5(body: &[u8]) -> String {
    STANDARD.encode(Md5::digest(body))
}

/// `x-ots-date` format: ISO-8601 UTC with milliseconds
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Credentials and instance identity used to sign requests
#[derive(Clone)]
pub struct RequestSigner {
    access_key_id: String,
    access_key_secret: String,
    instance_name: String,
    security_token: Option<String>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key_id", &self.access_key_id)
            .field("instance_name", &self.instance_name)
            .field("security_token", &self.security_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            instance_name: instance_name.into(),
            security_token: None,
        }
    }

    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let signer = Self::new(
            &config.access_key_id,
            &config.access_key_secret,
            &config.instance_name,
        );
        match &config.security_token {
            Some(token) => signer.with_security_token(token),
            None => signer,
        }
    }

    /// Full header set for a POST of `body` to `uri`, signature added last
    pub fn signed_headers(
        &self,
        uri: &str,
        body: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<RequestHeaders> {
        let mut request_headers = RequestHeaders::new();
        request_headers.insert(headers::DATE.to_string(), format_date(timestamp));
        request_headers.insert(headers::API_VERSION.to_string(), protocol::API_VERSION.to_string());
        request_headers.insert(headers::ACCESS_KEY_ID.to_string(), self.access_key_id.clone());
        request_headers.insert(headers::CONTENT_MD5.to_string(), content_md5(body));
        request_headers.insert(headers::INSTANCE_NAME.to_string(), self.instance_name.clone());
        if let Some(token) = &self.security_token {
            request_headers.insert(headers::STS_TOKEN.to_string(), token.clone());
        }

        let canonical = string_to_sign(uri, protocol::HTTP_METHOD, &request_headers);
        let signature = sign(&self.access_key_secret, &canonical)?;
        request_headers.insert(headers::SIGNATURE.to_string(), signature);
        Ok(request_headers)
    }
}
