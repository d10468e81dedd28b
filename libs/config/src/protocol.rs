//! Tablestore wire protocol constants
//!
//! Values fixed by the service: API version, the `x-ots-*` request and
//! response headers, and RPC paths.

/// API version sent with every request
pub const API_VERSION: &str = "2015-12-31";

/// HTTP method used by every RPC
pub const HTTP_METHOD: &str = "POST";

/// Prefix of the environment variables overriding configuration
pub const ENV_PREFIX: &str = "TABLESTORE";

/// Header names (lowercase, as signed)
pub mod headers {
    /// Only headers with this prefix take part in the signature
    pub const PREFIX: &str = "x-ots-";

    pub const DATE: &str = "x-ots-date";
    pub const API_VERSION: &str = "x-ots-apiversion";
    pub const ACCESS_KEY_ID: &str = "x-ots-accesskeyid";
    pub const CONTENT_MD5: &str = "x-ots-contentmd5";
    pub const INSTANCE_NAME: &str = "x-ots-instancename";
    pub const STS_TOKEN: &str = "x-ots-ststoken";
    /// Computed last; never part of the string to sign
    pub const SIGNATURE: &str = "x-ots-signature";

    /// Response header identifying the request server-side
    pub const REQUEST_ID: &str = "x-ots-requestid";
}

/// RPC paths
pub mod paths {
    pub const GET_ROW: &str = "/GetRow";
}

/// Configuration defaults
pub mod defaults {
    /// Whole-request timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

    /// TCP/TLS connect timeout (milliseconds)
    pub const CONNECT_TIMEOUT_MS: u64 = 10_000;
}
