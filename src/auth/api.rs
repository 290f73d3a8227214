//! Authentication endpoints.
//!
//! These live on the bare host (`/auth/...`), outside the `/api/v1` root,
//! so every call overrides the API root with `""`.

use tracing::debug;

use super::providers::OAuthProvider;
use crate::fetcher::{FetchError, Fetcher, RequestDescriptor, RequestOptions};
use crate::models::User;
use crate::traits::Method;

const ANONYMOUS_LOGIN_PATH: &str = "/auth/anonymous/login";
const EMAIL_LOGIN_PATH: &str = "/auth/email/login";
const LOGOUT_PATH: &str = "/auth/logout";

/// Append `params` to `path` as a percent-encoded query string.
pub fn stringify_url(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

#[derive(Clone)]
pub struct AuthApi {
    fetcher: Fetcher,
}

impl AuthApi {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    fn bare_host() -> RequestOptions {
        RequestOptions::new().api_root("")
    }

    /// Sign in under a chosen display name, without credentials.
    pub async fn anonymous_signin(&self, username: &str) -> Result<User, FetchError> {
        let config = self.fetcher.config();
        let return_url = config.return_url();
        let path = stringify_url(
            ANONYMOUS_LOGIN_PATH,
            &[
                ("from", return_url.as_str()),
                ("user", username),
                ("aud", config.site_id.as_str()),
            ],
        );
        self.fetcher.get(&path, Self::bare_host()).await
    }

    /// Ask the server to email a verification code to `email`.
    pub async fn email_signin(&self, email: &str, username: &str) -> Result<(), FetchError> {
        let path = stringify_url(EMAIL_LOGIN_PATH, &[("address", email), ("user", username)]);
        self.fetcher
            .request(RequestDescriptor::new(Method::Get, path, Self::bare_host()))
            .await
            .map(|_| ())
    }

    /// Exchange the emailed verification code for a session.
    pub async fn verify_email_signin(&self, code: &str) -> Result<User, FetchError> {
        let path = stringify_url(EMAIL_LOGIN_PATH, &[("token", code)]);
        self.fetcher.get(&path, Self::bare_host()).await
    }

    pub async fn logout(&self) -> Result<(), FetchError> {
        self.fetcher
            .request(RequestDescriptor::new(
                Method::Get,
                LOGOUT_PATH,
                Self::bare_host(),
            ))
            .await
            .map(|_| ())
    }

    /// Current identity, or `None` when there is no session.
    ///
    /// Any failure is treated as "no session".
    pub async fn current_user(&self) -> Option<User> {
        match self
            .fetcher
            .get::<Option<User>>("/user", RequestOptions::new())
            .await
        {
            Ok(user) => user,
            Err(e) => {
                debug!("Identity lookup failed, treating as signed out: {}", e);
                None
            }
        }
    }

    /// Address of the OAuth entry point for `provider`, returning to the
    /// hosting page when done.
    pub fn oauth_login_url(&self, provider: &OAuthProvider) -> String {
        let config = self.fetcher.config();
        let return_url = config.return_url();
        let path = stringify_url(
            &format!("/auth/{}/login", provider.name()),
            &[("from", return_url.as_str()), ("site", config.site_id.as_str())],
        );
        format!("{}{}", config.base_url, path)
    }
}
