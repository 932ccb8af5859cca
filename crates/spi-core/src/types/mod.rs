//! Resource and request types

mod access_check;
mod access_token;
mod binding;
mod labels;
mod matchable;
mod permissions;
mod provider_type;
mod remote_secret;

pub use access_check::*;
pub use access_token::*;
pub use binding::*;
pub use labels::*;
pub use matchable::*;
pub use permissions::*;
pub use provider_type::*;
pub use remote_secret::*;
