//! Sign-in state machine.
//!
//! ```text
//! FormEntry --submit(email)------> CodeVerification --submit(code)--> Complete
//!     |     <-------back----------        |
//!     +-----submit(anonymous)--------------------------------------> Complete
//! ```
//!
//! While a submission is outstanding `is_loading()` is true. Validation
//! errors are reported per field and never reach the network; request
//! failures collapse into one generic top-level message, with the
//! classified error kept in `last_error()` for logging.
//!
//! A flow can be torn down while a request is outstanding. The request is
//! not cancelled; its result is ignored and the flow state is left as is.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::api::AuthApi;
use super::providers::{FormProvider, OAuthProvider, ProviderSet};
use super::revalidation::RevalidationScheduler;
use super::validation::{
    code_invalid_reason, email_invalid_reason, username_invalid_reason, ValidationError,
};
use crate::fetcher::{FetchError, UNEXPECTED_ERROR_MESSAGE};
use crate::models::User;
use crate::traits::{BrowserError, SessionObserver};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    FormEntry,
    CodeVerification,
    Complete(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Code,
}

/// Result of [`SignInFlow::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Rejected,
    /// The flow moved to code verification.
    AwaitingCode,
    SignedIn(User),
    /// The request failed; see `top_error()` and `last_error()`.
    Failed,
    /// The flow was torn down before the response arrived.
    Abandoned,
    /// Nothing to submit: no form provider, already complete, or torn down.
    Unavailable,
}

/// Shared "is this flow still alive" flag.
#[derive(Debug, Clone)]
pub struct FlowLifetime(Arc<AtomicBool>);

impl FlowLifetime {
    pub fn new() -> Self {
        FlowLifetime(Arc::new(AtomicBool::new(true)))
    }

    pub fn end(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for FlowLifetime {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
struct Fields {
    username: String,
    email: String,
    code: String,
}

#[derive(Debug, Clone, Default)]
struct FieldErrors {
    username: Option<ValidationError>,
    email: Option<ValidationError>,
    code: Option<ValidationError>,
}

pub struct SignInFlow {
    auth: AuthApi,
    scheduler: Option<RevalidationScheduler>,
    observer: Option<Arc<dyn SessionObserver>>,
    advance_on_start_failure: bool,
    providers: ProviderSet,
    selected: Option<FormProvider>,
    state: FlowState,
    fields: Fields,
    errors: FieldErrors,
    top_error: Option<String>,
    last_error: Option<FetchError>,
    loading: bool,
    lifetime: FlowLifetime,
}

impl SignInFlow {
    /// Start in form entry with the first form provider selected.
    pub fn new(auth: AuthApi, providers: ProviderSet) -> Self {
        let advance_on_start_failure = auth.fetcher().config().advance_on_email_start_failure;
        Self {
            auth,
            scheduler: None,
            observer: None,
            advance_on_start_failure,
            selected: providers.default_form(),
            providers,
            state: FlowState::FormEntry,
            fields: Fields::default(),
            errors: FieldErrors::default(),
            top_error: None,
            last_error: None,
            loading: false,
            lifetime: FlowLifetime::new(),
        }
    }

    /// Scheduler to rewind after an OAuth window is opened.
    pub fn with_scheduler(mut self, scheduler: RevalidationScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Receiver of the identity when the flow completes.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub fn selected_provider(&self) -> Option<FormProvider> {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn top_error(&self) -> Option<&str> {
        self.top_error.as_deref()
    }

    /// Classified error behind the current top-level message.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn field_error(&self, field: Field) -> Option<ValidationError> {
        match field {
            Field::Username => self.errors.username,
            Field::Email => self.errors.email,
            Field::Code => self.errors.code,
        }
    }

    pub fn username(&self) -> &str {
        &self.fields.username
    }

    pub fn email(&self) -> &str {
        &self.fields.email
    }

    pub fn code(&self) -> &str {
        &self.fields.code
    }

    /// Handle another task can use to tear the flow down.
    pub fn lifetime(&self) -> FlowLifetime {
        self.lifetime.clone()
    }

    /// Switch form provider. Unknown providers are ignored.
    pub fn select_provider(&mut self, provider: FormProvider) -> bool {
        if !self.providers.form.contains(&provider) {
            warn!("Provider '{}' is not enabled on this site", provider);
            return false;
        }
        self.errors = FieldErrors::default();
        self.top_error = None;
        self.selected = Some(provider);
        true
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.fields.username = value.into();
        self.errors.username = None;
        self.top_error = None;
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.fields.email = value.into();
        self.errors.email = None;
        self.top_error = None;
    }

    pub fn set_code(&mut self, value: impl Into<String>) {
        self.fields.code = value.into();
        self.errors.code = None;
        self.top_error = None;
    }

    /// Leave code verification, discarding the code.
    pub fn back(&mut self) {
        if self.state != FlowState::CodeVerification {
            return;
        }
        self.fields.code.clear();
        self.errors.code = None;
        self.state = FlowState::FormEntry;
    }

    /// Submit the current step.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.lifetime.is_active() || self.loading {
            return SubmitOutcome::Unavailable;
        }
        match self.state {
            FlowState::FormEntry => self.submit_form().await,
            FlowState::CodeVerification => self.submit_code().await,
            FlowState::Complete(_) => SubmitOutcome::Unavailable,
        }
    }

    async fn submit_form(&mut self) -> SubmitOutcome {
        let Some(provider) = self.selected else {
            return SubmitOutcome::Unavailable;
        };

        let mut rejected = false;
        if provider == FormProvider::Email {
            if let Some(reason) = email_invalid_reason(&self.fields.email) {
                self.errors.email = Some(reason);
                rejected = true;
            }
        }
        if let Some(reason) = username_invalid_reason(&self.fields.username) {
            self.errors.username = Some(reason);
            rejected = true;
        }
        if rejected {
            return SubmitOutcome::Rejected;
        }

        let auth = self.auth.clone();
        let username = self.fields.username.clone();

        match provider {
            FormProvider::Email => {
                let email = self.fields.email.clone();
                let Some(result) = self
                    .run(async move { auth.email_signin(&email, &username).await })
                    .await
                else {
                    return SubmitOutcome::Abandoned;
                };

                match result {
                    Ok(()) => {
                        self.state = FlowState::CodeVerification;
                        SubmitOutcome::AwaitingCode
                    }
                    Err(e) => {
                        self.fail(e);
                        if self.advance_on_start_failure {
                            self.state = FlowState::CodeVerification;
                            SubmitOutcome::AwaitingCode
                        } else {
                            SubmitOutcome::Failed
                        }
                    }
                }
            }
            FormProvider::Anonymous => {
                let Some(result) = self
                    .run(async move { auth.anonymous_signin(&username).await })
                    .await
                else {
                    return SubmitOutcome::Abandoned;
                };
                self.finish(result)
            }
        }
    }

    async fn submit_code(&mut self) -> SubmitOutcome {
        let now = self.auth.fetcher().clock().now();
        if let Some(reason) = code_invalid_reason(&self.fields.code, now) {
            self.errors.code = Some(reason);
            return SubmitOutcome::Rejected;
        }

        let auth = self.auth.clone();
        let code = self.fields.code.trim().to_string();
        let Some(result) = self
            .run(async move { auth.verify_email_signin(&code).await })
            .await
        else {
            return SubmitOutcome::Abandoned;
        };
        self.finish(result)
    }

    /// Open the OAuth entry point for `provider` in a new window and make
    /// the next visibility signal revalidate straight away.
    pub fn submit_oauth(&mut self, provider: &OAuthProvider) -> Result<String, BrowserError> {
        let url = self.auth.oauth_login_url(provider);
        self.auth.fetcher().browser().open_window(&url)?;
        if let Some(scheduler) = &self.scheduler {
            scheduler.rewind();
        }
        info!("Opened {} sign-in window", provider);
        Ok(url)
    }

    /// End the flow. Outstanding requests run to completion but their
    /// results are dropped.
    pub fn teardown(&mut self) {
        if self.lifetime.is_active() {
            debug!("Sign-in flow torn down");
        }
        self.lifetime.end();
    }

    /// Run a request on its own task so dropping the caller does not cancel
    /// it. `None` means the flow ended while it was outstanding.
    async fn run<T, F>(&mut self, request: F) -> Option<Result<T, FetchError>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        self.loading = true;
        self.top_error = None;

        let joined = tokio::spawn(request).await;

        if !self.lifetime.is_active() {
            debug!("Ignoring sign-in response for a torn-down flow");
            return None;
        }
        self.loading = false;

        Some(joined.unwrap_or_else(|e| {
            Err(FetchError::Transport {
                message: e.to_string(),
            })
        }))
    }

    fn finish(&mut self, result: Result<User, FetchError>) -> SubmitOutcome {
        match result {
            Ok(user) => {
                info!("Signed in as {}", user.name);
                if let Some(observer) = &self.observer {
                    observer.session_established(&user);
                }
                self.state = FlowState::Complete(user.clone());
                SubmitOutcome::SignedIn(user)
            }
            Err(e) => {
                self.fail(e);
                SubmitOutcome::Failed
            }
        }
    }

    fn fail(&mut self, err: FetchError) {
        warn!("Sign-in request failed (code {}): {}", err.code(), err);
        self.top_error = Some(UNEXPECTED_ERROR_MESSAGE.to_string());
        self.last_error = Some(err);
    }
}

impl Drop for SignInFlow {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}
