//! Error types for service providers and token lookup
//!
//! Every error has an [`ErrorKind`] so callers can tell "nothing found"
//! from "found but broken" without looking at messages.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Kinds of errors, for branching without matching on messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    MissingNamespace,
    List,
    Get,
    NotFound,
    Aggregate,
    TokenDataNotFound,
    MissingTarget,
    SecretDataEmpty,
    Metadata,
    Filter,
    TokenStorage,
    Http,
    UnexpectedStatus,
    FileTooLarge,
    UnsupportedScope,
    UnsupportedArea,
    UnsupportedPermission,
    Configuration,
    Kube,
}

#[derive(Error, Debug)]
pub enum Error {
    /// The repository URL can't be parsed
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The repository URL doesn't point at a project of the provider
    #[error("repository url {url} is not a project url of {base_url}")]
    UnrecognizedRepoUrl { url: String, base_url: String },

    /// Lookups are confined to the requester's namespace, so one is required
    #[error("request for {repo_url} has no namespace")]
    MissingNamespace { repo_url: String },

    #[error("failed to list the potentially matching {resource}: {source}")]
    List {
        resource: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("unable to get {resource} {name}: {source}")]
    Get {
        resource: &'static str,
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{resource} {name} not found")]
    NotFound { resource: &'static str, name: String },

    /// Every failure collected while examining lookup candidates
    #[error("errors while examining the potential matches: {0}")]
    Aggregate(AggregateError),

    /// The token resource exists but its data is missing from token storage
    #[error("token data of {token} is not found in token storage")]
    TokenDataNotFound { token: String },

    /// A matching RemoteSecret was never delivered to the requester's namespace
    #[error("found RemoteSecret {remote_secret} does not have a target in namespace {namespace}")]
    MissingTarget { remote_secret: String, namespace: String },

    #[error("secret {secret} has no data")]
    SecretDataEmpty { secret: String },

    #[error("failed to refresh the metadata of token {token}: {source}")]
    Metadata {
        token: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to match token {token}: {source}")]
    Filter {
        token: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to get token data: {0}")]
    TokenStorage(#[from] spi_tokenstorage::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("file {path} exceeds the size limit of {limit} bytes")]
    FileTooLarge { path: String, limit: u64 },

    #[error("unsupported scope for {provider}: '{scope}'")]
    UnsupportedScope { provider: &'static str, scope: String },

    #[error("unsupported permission area for {provider}: '{area}'")]
    UnsupportedArea { provider: &'static str, area: String },

    #[error("{area} write permission is not supported by {provider}")]
    UnsupportedPermission { provider: &'static str, area: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Core(#[from] spi_core::Error),

    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Provider-level context around an engine error
    #[error("{provider} {operation} failure: {source}")]
    Provider {
        provider: &'static str,
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } | Error::UnrecognizedRepoUrl { .. } => ErrorKind::InvalidUrl,
            Error::MissingNamespace { .. } => ErrorKind::MissingNamespace,
            Error::List { .. } => ErrorKind::List,
            Error::Get { .. } => ErrorKind::Get,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Aggregate(_) => ErrorKind::Aggregate,
            Error::TokenDataNotFound { .. } => ErrorKind::TokenDataNotFound,
            Error::MissingTarget { .. } => ErrorKind::MissingTarget,
            Error::SecretDataEmpty { .. } => ErrorKind::SecretDataEmpty,
            Error::Metadata { .. } => ErrorKind::Metadata,
            Error::Filter { .. } => ErrorKind::Filter,
            Error::TokenStorage(_) => ErrorKind::TokenStorage,
            Error::Http(_) => ErrorKind::Http,
            Error::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Error::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Error::UnsupportedScope { .. } => ErrorKind::UnsupportedScope,
            Error::UnsupportedArea { .. } => ErrorKind::UnsupportedArea,
            Error::UnsupportedPermission { .. } => ErrorKind::UnsupportedPermission,
            Error::Configuration { .. } | Error::Core(_) => ErrorKind::Configuration,
            Error::Kube(_) => ErrorKind::Kube,
            Error::Provider { source, .. } => source.kind(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::Provider { source, .. } => source.status_code(),
            _ => None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            name: name.into(),
        }
    }

    pub fn list(resource: &'static str, source: Error) -> Self {
        Self::List {
            resource,
            source: Box::new(source),
        }
    }

    pub fn get(resource: &'static str, name: impl Into<String>, source: Error) -> Self {
        Self::Get {
            resource,
            name: name.into(),
            source: Box::new(source),
        }
    }

    pub fn metadata(token: impl Into<String>, source: Error) -> Self {
        Self::Metadata {
            token: token.into(),
            source: Box::new(source),
        }
    }

    pub fn filter(token: impl Into<String>, source: Error) -> Self {
        Self::Filter {
            token: token.into(),
            source: Box::new(source),
        }
    }

    pub fn unexpected_status(status: u16, url: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            url: url.into(),
        }
    }

    pub fn provider(provider: &'static str, operation: &'static str, source: Error) -> Self {
        Self::Provider {
            provider,
            operation,
            source: Box::new(source),
        }
    }

    /// The collected errors when this is an aggregate, looking through provider context
    pub fn as_aggregate(&self) -> Option<&AggregateError> {
        match self {
            Error::Aggregate(agg) => Some(agg),
            Error::Provider { source, .. } => source.as_aggregate(),
            _ => None,
        }
    }
}

/// A non-empty list of errors reported together
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<Error>,
}

impl AggregateError {
    /// Returns None for an empty list
    pub fn new(errors: Vec<Error>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.errors.as_slice() {
            return write!(f, "{single}");
        }
        write!(f, "[")?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for AggregateError {}
