pub mod json_backend;

use std::fmt;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The four named documents the persistence collaborator stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Config,
    Production,
    Transactions,
    Sales,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Config,
        DocumentKind::Production,
        DocumentKind::Transactions,
        DocumentKind::Sales,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Config => "config",
            DocumentKind::Production => "production",
            DocumentKind::Transactions => "transactions",
            DocumentKind::Sales => "sales",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Abstraction over backends that store whole JSON documents.
///
/// `load` answers `None` for a document that has never been written; errors
/// are propagated to the caller untouched. Retry and conflict handling, if
/// any, live behind the implementation.
pub trait DocumentStore: Send + Sync {
    fn load(&self, kind: DocumentKind) -> Result<Option<serde_json::Value>>;

    /// Writes a whole document. `message` describes the change for backends
    /// that keep a history.
    fn save(&self, kind: DocumentKind, value: &serde_json::Value, message: &str) -> Result<()>;
}

pub use json_backend::JsonStorage;
