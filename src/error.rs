use std::path::PathBuf;

/// Failure to turn an input file into a [`crate::schema::SchemaDocument`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed schema in {origin}: {message}")]
    Schema { origin: String, message: String },
}

/// Why a single `$ref` could not be dereferenced against the root document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("only document-local `#...` references are supported")]
    Unsupported,
    #[error("no schema node at JSON pointer `{0}`")]
    Missing(String),
    #[error("target is not a schema object: {0}")]
    Malformed(String),
}

/// Errors raised while building the record tree. All of them abort the
/// top-level property being resolved; none leave a partial record behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("recursion depth exceeds {limit} at `{path}`")]
    DepthExceeded { limit: usize, path: String },

    #[error("cannot resolve `{reference}` at `{path}`: {source}")]
    ReferenceResolutionFailed {
        reference: String,
        path: String,
        #[source]
        source: ReferenceError,
    },

    #[error("schema at `{path}` declares no usable primitive type")]
    MalformedTypeList { path: String },

    #[error("`{name}` is declared more than once with different shapes at `{path}`")]
    NameCollision { name: String, path: String },
}
