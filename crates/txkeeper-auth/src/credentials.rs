//! Credential lookup behind the login endpoint

use txkeeper_config::AuthenticationConfig;

/// Source of valid user name / password pairs
pub trait CredentialStore: Send + Sync {
    /// True when the pair is valid. Comparison is exact and case-sensitive.
    fn verify(&self, user_name: &str, password: &str) -> bool;
}

/// Exactly one configured account
#[derive(Clone)]
pub struct SingleCredentialStore {
    user_name: String,
    password: String,
}

impl SingleCredentialStore {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthenticationConfig) -> Self {
        Self::new(&config.user_name, &config.password)
    }
}

impl CredentialStore for SingleCredentialStore {
    fn verify(&self, user_name: &str, password: &str) -> bool {
        user_name == self.user_name && password == self.password
    }
}

impl std::fmt::Debug for SingleCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleCredentialStore")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let store = SingleCredentialStore::new("validUser", "validPassword");

        assert!(store.verify("validUser", "validPassword"));
        assert!(!store.verify("invalidUser", "invalidPassword"));
        assert!(!store.verify("validuser", "validPassword"));
        assert!(!store.verify("validUser", "validPassword "));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn test_debug_hides_password() {
        let store = SingleCredentialStore::new("lenvi", "P4ssw0rd");
        let printed = format!("{:?}", store);
        assert!(printed.contains("lenvi"));
        assert!(!printed.contains("P4ssw0rd"));
    }
}
