//! Sign-in providers advertised by the server.

use tracing::warn;

use crate::models::RemoteConfig;

/// Providers that sign in through a redirect to a third party.
pub const OAUTH_PROVIDERS: &[&str] = &[
    "facebook",
    "twitter",
    "google",
    "github",
    "microsoft",
    "yandex",
    "patreon",
    "apple",
    "dev",
];

/// Providers that sign in through the widget's own form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormProvider {
    Anonymous,
    Email,
}

impl FormProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormProvider::Anonymous => "anonymous",
            FormProvider::Email => "email",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "anonymous" => Some(FormProvider::Anonymous),
            "email" => Some(FormProvider::Email),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A third-party provider name, known to be in [`OAUTH_PROVIDERS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OAuthProvider(String);

impl OAuthProvider {
    pub fn parse(name: &str) -> Option<Self> {
        OAUTH_PROVIDERS
            .contains(&name)
            .then(|| OAuthProvider(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server's provider list split into OAuth and form providers, in
/// configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSet {
    pub oauth: Vec<OAuthProvider>,
    pub form: Vec<FormProvider>,
}

impl ProviderSet {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = ProviderSet::default();
        for name in names {
            let name = name.as_ref();
            if let Some(provider) = OAuthProvider::parse(name) {
                set.oauth.push(provider);
            } else if let Some(provider) = FormProvider::parse(name) {
                set.form.push(provider);
            } else {
                warn!("Ignoring unknown auth provider '{}'", name);
            }
        }
        set
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::from_names(&config.auth_providers)
    }

    /// Form provider selected when the flow starts.
    pub fn default_form(&self) -> Option<FormProvider> {
        self.form.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.oauth.is_empty() && self.form.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        let set = ProviderSet::from_names(&["github", "email", "google", "anonymous"]);
        let oauth: Vec<&str> = set.oauth.iter().map(OAuthProvider::name).collect();
        assert_eq!(oauth, vec!["github", "google"]);
        assert_eq!(set.form, vec![FormProvider::Email, FormProvider::Anonymous]);
        assert_eq!(set.default_form(), Some(FormProvider::Email));
    }

    #[test]
    fn test_unknown_provider_skipped() {
        let set = ProviderSet::from_names(&["myspace", "dev"]);
        assert_eq!(set.oauth.len(), 1);
        assert!(set.form.is_empty());
        assert_eq!(set.default_form(), None);
    }

    #[test]
    fn test_from_config() {
        let config = RemoteConfig {
            auth_providers: vec!["anonymous".to_string()],
            ..Default::default()
        };
        let set = ProviderSet::from_config(&config);
        assert_eq!(set.form, vec![FormProvider::Anonymous]);
        assert!(set.oauth.is_empty());
        assert!(!set.is_empty());
        assert!(ProviderSet::default().is_empty());
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(FormProvider::Email.to_string(), "email");
        assert_eq!(OAuthProvider::parse("apple").unwrap().to_string(), "apple");
        assert!(OAuthProvider::parse("email").is_none());
    }
}
