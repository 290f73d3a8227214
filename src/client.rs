//! Client facade wiring the fetcher, auth and comment endpoints around one
//! shared session context.
//!
//! # Example
//!
//! ```ignore
//! use remark_client::{ClientConfig, RemarkClient};
//!
//! let client = RemarkClient::builder(ClientConfig::from_env()).build();
//! let config = client.comments().config().await?;
//! let mut flow = client.sign_in_flow(&config);
//! ```

use reqwest::cookie::Jar;
use reqwest::Url;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{HeadlessBrowser, ReqwestHttpClient, SystemClock};
use crate::api::CommentApi;
use crate::auth::{AuthApi, ProviderSet, RevalidationScheduler, SignInFlow};
use crate::config::ClientConfig;
use crate::fetcher::{FetchError, Fetcher};
use crate::models::RemoteConfig;
use crate::session::SessionContext;
use crate::traits::{BrowserEnvironment, Clock, HttpClient, SessionObserver};

pub struct RemarkClientBuilder {
    config: ClientConfig,
    http: Option<Arc<dyn HttpClient>>,
    browser: Option<Arc<dyn BrowserEnvironment>>,
    clock: Option<Arc<dyn Clock>>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl RemarkClientBuilder {
    pub fn http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn browser(mut self, browser: Arc<dyn BrowserEnvironment>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the client. Missing pieces default to reqwest, a headless
    /// browser and the system clock. The default transport and browser share
    /// one cookie jar, so the anti-forgery cookie set by the server is read
    /// back for the request header.
    pub fn build(self) -> RemarkClient {
        let jar = Arc::new(Jar::default());
        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::with_cookie_jar(Arc::clone(&jar))));
        let browser = self.browser.unwrap_or_else(|| {
            let browser = HeadlessBrowser::new();
            match Url::parse(&self.config.base_url) {
                Ok(url) => Arc::new(browser.with_cookie_jar(jar, url)),
                Err(e) => {
                    warn!("Cookies unavailable for {}: {}", self.config.base_url, e);
                    Arc::new(browser)
                }
            }
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let fetcher = Fetcher::new(
            self.config,
            http,
            browser,
            clock,
            Arc::new(SessionContext::new()),
        );
        let auth = AuthApi::new(fetcher.clone());
        let mut scheduler = RevalidationScheduler::new(auth.clone());
        if let Some(observer) = &self.observer {
            scheduler = scheduler.with_observer(Arc::clone(observer));
        }

        RemarkClient {
            comments: CommentApi::new(fetcher.clone()),
            fetcher,
            auth,
            scheduler,
            observer: self.observer,
        }
    }
}

#[derive(Clone)]
pub struct RemarkClient {
    fetcher: Fetcher,
    auth: AuthApi,
    comments: CommentApi,
    scheduler: RevalidationScheduler,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl RemarkClient {
    pub fn builder(config: ClientConfig) -> RemarkClientBuilder {
        RemarkClientBuilder {
            config,
            http: None,
            browser: None,
            clock: None,
            observer: None,
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.fetcher.session()
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn comments(&self) -> &CommentApi {
        &self.comments
    }

    pub fn scheduler(&self) -> &RevalidationScheduler {
        &self.scheduler
    }

    /// New sign-in flow offering the providers enabled in `config`.
    pub fn sign_in_flow(&self, config: &RemoteConfig) -> SignInFlow {
        let flow = SignInFlow::new(self.auth.clone(), ProviderSet::from_config(config))
            .with_scheduler(self.scheduler.clone());
        match &self.observer {
            Some(observer) => flow.with_observer(Arc::clone(observer)),
            None => flow,
        }
    }

    /// End the server session and tell the observer.
    pub async fn logout(&self) -> Result<(), FetchError> {
        self.auth.logout().await?;
        info!("Signed out");
        if let Some(observer) = &self.observer {
            observer.session_cleared();
        }
        Ok(())
    }
}
