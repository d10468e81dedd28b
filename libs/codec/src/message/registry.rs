//! # Schema Registry - Lazily Loaded Definition Sets
//!
//! ## Purpose
//!
//! Owns the two independent schema namespaces (request/response envelopes and
//! server-side filter expressions). Each namespace is parsed on first use and
//! cached in a [`OnceCell`] for the life of the registry, so a client that only
//! reads rows never pays for the filter definitions. Concurrent first use is
//! serialized by the cell: the definition file is parsed at most once.
//!
//! Definitions come either from the copies compiled into this crate or from a
//! caller-supplied directory holding files with the same names.

use super::schema::{MessageSchema, SchemaSet};
use crate::error::{CodecError, CodecResult};
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

const API_FILE: &str = "ots_internal_api.proto";
const FILTER_FILE: &str = "ots_filter.proto";

const EMBEDDED_API: &str = include_str!("../../protocol/ots_internal_api.proto");
const EMBEDDED_FILTER: &str = include_str!("../../protocol/ots_filter.proto");

/// Independent schema namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaNamespace {
    /// Request, response and error envelopes
    Api,
    /// Server-side filter expressions
    Filter,
}

impl SchemaNamespace {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Api => API_FILE,
            Self::Filter => FILTER_FILE,
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            Self::Api => EMBEDDED_API,
            Self::Filter => EMBEDDED_FILTER,
        }
    }
}

impl fmt::Display for SchemaNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::Filter => f.write_str("filter"),
        }
    }
}

/// Where definition files are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Embedded,
    Directory(PathBuf),
}

/// Per-namespace, load-once schema cache
#[derive(Debug)]
pub struct SchemaRegistry {
    source: SchemaSource,
    api: OnceCell<SchemaSet>,
    filter: OnceCell<SchemaSet>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::embedded()
    }
}

impl SchemaRegistry {
    /// Registry backed by the definitions compiled into the crate
    pub fn embedded() -> Self {
        Self::with_source(SchemaSource::Embedded)
    }

    /// Registry reading `ots_internal_api.proto` / `ots_filter.proto` from `dir`
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_source(SchemaSource::Directory(dir.into()))
    }

    pub fn with_source(source: SchemaSource) -> Self {
        Self {
            source,
            api: OnceCell::new(),
            filter: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    /// True once the namespace has been parsed
    pub fn is_loaded(&self, namespace: SchemaNamespace) -> bool {
        self.cell(namespace).get().is_some()
    }

    /// Schema set of a namespace, loading it on first use
    pub fn namespace(&self, namespace: SchemaNamespace) -> CodecResult<&SchemaSet> {
        self.cell(namespace)
            .get_or_try_init(|| self.load(namespace))
    }

    /// Look up a message by fully qualified name
    pub fn message(&self, namespace: SchemaNamespace, name: &str) -> CodecResult<&MessageSchema> {
        self.namespace(namespace)?
            .message(name)
            .ok_or_else(|| CodecError::unknown_message(name, namespace.to_string()))
    }

    fn cell(&self, namespace: SchemaNamespace) -> &OnceCell<SchemaSet> {
        match namespace {
            SchemaNamespace::Api => &self.api,
            SchemaNamespace::Filter => &self.filter,
        }
    }

    fn load(&self, namespace: SchemaNamespace) -> CodecResult<SchemaSet> {
        let file_name = namespace.file_name();
        let set = match &self.source {
            SchemaSource::Embedded => SchemaSet::parse(file_name, namespace.embedded())?,
            SchemaSource::Directory(dir) => {
                let path = dir.join(file_name);
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    CodecError::schema_load(path.display().to_string(), e.to_string())
                })?;
                SchemaSet::parse(&path.display().to_string(), &text)?
            }
        };

        info!(
            namespace = %namespace,
            source = ?self.source,
            messages = set.message_names().count(),
            "Loaded schema definitions"
        );
        Ok(set)
    }
}
