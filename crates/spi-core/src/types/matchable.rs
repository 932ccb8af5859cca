//! Request descriptors consumed by token lookup and validation

use super::Permissions;

/// Something that can be matched against stored tokens and remote secrets.
///
/// Implemented by every resource that asks for credentials to a repository.
pub trait Matchable: Send + Sync {
    /// Repository URL, possibly without a scheme
    fn repo_url(&self) -> &str;

    /// Namespace of the requesting object; lookups never leave it.
    ///
    /// Empty when the object has no namespace, which lookups reject.
    fn obj_namespace(&self) -> &str;

    /// Permissions the requester needs
    fn permissions(&self) -> &Permissions;
}

/// Something whose requested permissions can be validated by a service provider
pub trait Validated: Send + Sync {
    fn permissions(&self) -> &Permissions;
}
