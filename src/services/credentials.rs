use std::env;

/// SMTP password or app token. `Debug` never prints the value.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Source of the mailbox secret. Swap implementations to read from a keyring
/// or vault without touching the dispatch flow.
pub trait CredentialProvider {
    /// Human-readable description of where the secret is expected, for error messages.
    fn source(&self) -> String;

    fn fetch(&self) -> Option<Secret>;
}

/// Reads the secret from an environment variable. Empty values count as absent.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn source(&self) -> String {
        self.var.clone()
    }

    fn fetch(&self) -> Option<Secret> {
        env::var(&self.var)
            .ok()
            .filter(|s| !s.is_empty())
            .map(Secret::new)
    }
}

/// Fixed secret, mostly useful in tests.
pub struct StaticCredentialProvider(pub Option<Secret>);

impl CredentialProvider for StaticCredentialProvider {
    fn source(&self) -> String {
        "static credential".into()
    }

    fn fetch(&self) -> Option<Secret> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_env_provider() {
        // Variable names are unique to this test so parallel tests don't collide.
        let provider = EnvCredentialProvider::new("MESS_MENU_TEST_PASSWORD_SET");
        env::set_var("MESS_MENU_TEST_PASSWORD_SET", "app-token");
        assert_eq!(provider.fetch().unwrap().expose(), "app-token");

        let empty = EnvCredentialProvider::new("MESS_MENU_TEST_PASSWORD_EMPTY");
        env::set_var("MESS_MENU_TEST_PASSWORD_EMPTY", "");
        assert!(empty.fetch().is_none());

        let unset = EnvCredentialProvider::new("MESS_MENU_TEST_PASSWORD_UNSET");
        assert!(unset.fetch().is_none());
        assert_eq!(unset.source(), "MESS_MENU_TEST_PASSWORD_UNSET");
    }
}
