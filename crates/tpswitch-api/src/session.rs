// Authenticated session against one switch
//
// Owns the cookie-carrying `reqwest::Client`, submits the logon form,
// and funnels every page fetch and command through a lazy login check.
// The login transition is serialized by an async mutex so concurrent
// callers never race each other into duplicate logons.

use std::sync::RwLock;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, trace, warn};
use url::Url;
use url::form_urlencoded;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Logon form endpoint.
pub const LOGON_PATH: &str = "/logon.cgi";

/// The switch only embeds this array in the page served after a good logon.
const LOGON_MARKER: &str = "logonInfo";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything needed to open a session against one switch.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Web interface root, including scheme (e.g. `http://192.168.0.1`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub transport: TransportConfig,
}

/// Authentication state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// One authenticated HTTP session against a switch.
///
/// Reads and commands call [`get`](Self::get) / [`post`](Self::post) (or
/// their `try_` forms); the first call on an unauthenticated session logs
/// in implicitly. A failed login short-circuits the request without a
/// second network round-trip.
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    state: RwLock<SessionState>,
    /// Held for the whole logon exchange.
    login_lock: tokio::sync::Mutex<()>,
}

impl Session {
    /// Create a session from a [`SwitchConfig`].
    ///
    /// A cookie jar is added to the transport if it doesn't carry one,
    /// since the switch tracks logons purely by cookie.
    pub fn new(config: &SwitchConfig) -> Result<Self, Error> {
        let transport = if config.transport.cookie_jar.is_some() {
            config.transport.clone()
        } else {
            config.transport.clone().with_cookie_jar()
        };
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
        ))
    }

    /// Create a session around a pre-built `reqwest::Client`.
    ///
    /// The client must keep cookies between requests for the session to
    /// survive past the logon.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        debug!(url = %base_url, "session created");
        Self {
            http,
            base_url,
            username,
            password,
            state: RwLock::new(SessionState::Unauthenticated),
            login_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.read().expect("session state lock poisoned")
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Drop back to `Unauthenticated` so the next request logs in again.
    pub fn invalidate(&self) {
        debug!("session invalidated");
        self.set_state(SessionState::Unauthenticated);
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().expect("session state lock poisoned") = state;
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Submit the logon form. Returns `false` on any failure.
    pub async fn login(&self) -> bool {
        match self.try_login().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "login failed");
                false
            }
        }
    }

    /// Submit the logon form, reporting why it failed.
    ///
    /// Success requires a 2xx status *and* the `logonInfo` marker in the
    /// body; the switch answers bad credentials with a 200 page too.
    pub async fn try_login(&self) -> Result<(), Error> {
        let _guard = self.login_lock.lock().await;
        self.login_locked().await
    }

    async fn login_locked(&self) -> Result<(), Error> {
        self.set_state(SessionState::Authenticating);
        let result = self.submit_logon().await;
        self.set_state(if result.is_ok() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        });
        result
    }

    async fn submit_logon(&self) -> Result<(), Error> {
        let url = self.url(LOGON_PATH)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.username)
            .append_pair("password", self.password.expose_secret())
            .append_pair("cpassword", "")
            .append_pair("logon", "Login")
            .finish();

        debug!(%url, username = %self.username, "logging in");

        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        trace!(%status, length = text.len(), "logon response");

        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }
        if !text.contains(LOGON_MARKER) {
            return Err(Error::Authentication {
                message: format!("response did not contain `{LOGON_MARKER}`"),
            });
        }

        info!("login successful");
        Ok(())
    }

    async fn ensure_authenticated(&self) -> Result<(), Error> {
        if self.is_authenticated() {
            return Ok(());
        }

        let _guard = self.login_lock.lock().await;
        // Another caller may have finished logging in while we waited.
        if self.is_authenticated() {
            return Ok(());
        }

        self.login_locked().await.map_err(|e| {
            warn!(error = %e, "implicit login failed");
            Error::NotAuthenticated
        })
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// GET a page, returning its body or empty text on any failure.
    pub async fn get(&self, path: &str) -> String {
        self.try_get(path).await.unwrap_or_else(|e| {
            warn!(path, error = %e, "GET failed");
            String::new()
        })
    }

    /// POST a form-encoded body, returning the response body or empty
    /// text on any failure.
    pub async fn post(&self, path: &str, body: &str) -> String {
        self.try_post(path, body).await.unwrap_or_else(|e| {
            warn!(path, error = %e, "POST failed");
            String::new()
        })
    }

    /// GET a page. `path` may carry a query string.
    pub async fn try_get(&self, path: &str) -> Result<String, Error> {
        self.ensure_authenticated().await?;
        let url = self.url(path)?;
        debug!(path, "GET");
        let resp = self.http.get(url).send().await?;
        self.read_body(path, resp).await
    }

    /// POST a form-encoded body.
    pub async fn try_post(&self, path: &str, body: &str) -> Result<String, Error> {
        self.ensure_authenticated().await?;
        let url = self.url(path)?;
        debug!(path, body, "POST");
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body.to_owned())
            .send()
            .await?;
        self.read_body(path, resp).await
    }

    async fn read_body(&self, path: &str, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let text = resp.text().await?;
        trace!(path, %status, length = text.len(), "response");

        if !status.is_success() {
            let err = Error::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            };
            if err.is_auth_expired() {
                self.invalidate();
            }
            return Err(err);
        }
        if text.is_empty() {
            return Err(Error::EmptyResponse {
                path: path.to_owned(),
            });
        }
        trace!(path, body = %text, "response body");
        Ok(text)
    }
}
