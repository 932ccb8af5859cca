//! Well-known labels and annotations
//!
//! These names are a contract with the resources stored in the cluster and
//! must not change.

/// Label on access tokens carrying the service provider type
pub const SERVICE_PROVIDER_TYPE_LABEL: &str = "spi.appstudio.redhat.com/service-provider-type";

/// Label on access tokens carrying the service provider host
pub const SERVICE_PROVIDER_HOST_LABEL: &str = "spi.appstudio.redhat.com/service-provider-host";

/// Label on remote secrets carrying the service provider host
pub const RS_SERVICE_PROVIDER_HOST_LABEL: &str = "appstudio.redhat.com/sp.host";

/// Annotation on remote secrets listing the repositories they are scoped to
pub const RS_SERVICE_PROVIDER_REPOSITORY_ANNOTATION: &str = "appstudio.redhat.com/sp.repository";

/// Key of the username in a basic-auth secret
pub const BASIC_AUTH_USERNAME_KEY: &str = "username";

/// Key of the password in a basic-auth secret
pub const BASIC_AUTH_PASSWORD_KEY: &str = "password";

/// Secret type of basic-auth secrets
pub const SECRET_TYPE_BASIC_AUTH: &str = "kubernetes.io/basic-auth";

/// Split a comma separated annotation value into its trimmed, non-empty items
pub fn comma_separated_values(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_values() {
        assert_eq!(
            comma_separated_values("org/repo, org/other,,"),
            vec!["org/repo", "org/other"]
        );
        assert!(comma_separated_values("").is_empty());
    }
}
