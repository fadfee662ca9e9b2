// Switch client: page reports and commands
//
// `SwitchClient` turns the session's raw page text into typed records and
// encodes mutating operations into the request shapes the web UI sends.
// Report and command methods live in `ports`, `vlans` and `cable`; this
// module only holds the client and the shared read/absorb plumbing.

pub mod cable;
pub mod ports;
pub mod vlans;

use tracing::{debug, warn};

use crate::error::Error;
use crate::extract::PageExtractor;
use crate::session::{Session, SwitchConfig};

/// Port count assumed by VLAN edits when the caller doesn't give one.
pub const DEFAULT_PORT_COUNT: u32 = 24;

pub(crate) const PORT_SETTINGS_PAGE: &str = "/PortSettingRpm.htm";
pub(crate) const PORT_STATISTICS_PAGE: &str = "/PortStatisticsRpm.htm";
pub(crate) const VLAN_PAGE: &str = "/Vlan8021QRpm.htm";
pub(crate) const PORT_SETTING_CGI: &str = "/port_setting.cgi";
pub(crate) const VLAN_SET_CGI: &str = "/qvlanSet.cgi";
pub(crate) const PVID_SET_CGI: &str = "/vlanPvidSet.cgi";
pub(crate) const CABLE_DIAG_CGI: &str = "/cable_diag_get.cgi";

/// High-level client for one switch.
///
/// Every operation comes in two forms: a plain one that never fails
/// (empty list / `false` on any problem, with the cause logged) and a
/// `try_` one that returns the [`Error`] instead.
pub struct SwitchClient {
    session: Session,
    port_count: u32,
}

impl SwitchClient {
    pub fn new(config: &SwitchConfig) -> Result<Self, Error> {
        Ok(Self::from_session(Session::new(config)?))
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            session,
            port_count: DEFAULT_PORT_COUNT,
        }
    }

    /// Override the port count used by VLAN edits.
    pub fn with_port_count(mut self, port_count: u32) -> Self {
        self.port_count = port_count;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn port_count(&self) -> u32 {
        self.port_count
    }

    /// Log in explicitly. Reports and commands also log in on demand.
    pub async fn login(&self) -> bool {
        self.session.login().await
    }

    pub async fn try_login(&self) -> Result<(), Error> {
        self.session.try_login().await
    }

    // ── Shared plumbing ──────────────────────────────────────────────

    /// Fetch `path` and run a report parser over it.
    ///
    /// A page that answers 200 but lacks the report's arrays is most often
    /// the login page served to an expired cookie, so the session is
    /// marked stale and the next call logs in again.
    pub(crate) async fn read_report<T, F>(&self, path: &str, parse: F) -> Result<Vec<T>, Error>
    where
        F: FnOnce(&PageExtractor<'_>) -> Result<Vec<T>, Error>,
    {
        let page = self.session.try_get(path).await?;
        let result = parse(&PageExtractor::new(&page));
        if let Err(Error::MissingArray { name }) = &result {
            debug!(path, name, "page lacks expected array; marking session stale");
            self.session.invalidate();
        }
        result
    }

    /// Issue a GET command; any non-empty answer counts as success.
    pub(crate) async fn send_get_command(&self, path_and_query: &str) -> Result<(), Error> {
        self.session.try_get(path_and_query).await.map(|_| ())
    }

    /// Issue a POST command; any non-empty answer counts as success.
    pub(crate) async fn send_post_command(&self, path: &str, body: &str) -> Result<(), Error> {
        self.session.try_post(path, body).await.map(|_| ())
    }
}

/// Swallow a report error into an empty list, logging the cause.
pub(crate) fn absorb_report<T>(operation: &'static str, result: Result<Vec<T>, Error>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(operation, kind = ?e.kind(), error = %e, "report failed");
        Vec::new()
    })
}

/// Swallow a command error into `false`, logging the cause.
pub(crate) fn absorb_command(operation: &'static str, result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(operation, kind = ?e.kind(), error = %e, "command failed");
            false
        }
    }
}
