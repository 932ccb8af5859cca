//! OAuth scope helpers

use spi_core::types::{Permission, Permissions};

/// Provider scopes for the permissions: translated required permissions
/// followed by the additional scopes, without duplicates.
pub fn get_all_scopes(translate: fn(&Permission) -> Vec<String>, permissions: &Permissions) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    let translated = permissions.required.iter().flat_map(translate);
    for scope in translated.chain(permissions.additional_scopes.iter().cloned()) {
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }
    scopes
}
