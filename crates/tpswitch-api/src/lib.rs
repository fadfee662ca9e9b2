// tpswitch-api: Async Rust client for TP-Link easy smart switch web management
//
// The switch has no JSON API; every page embeds its state as script
// array literals. `session` keeps the cookie-based logon alive,
// `extract` pulls arrays out of page text, and `switch` turns them into
// typed records and encodes commands.

pub mod error;
pub mod extract;
pub mod labels;
pub mod models;
pub mod session;
pub mod switch;
pub mod transport;

pub use error::{Error, ErrorKind};
pub use extract::{ArrayExtractor, PageExtractor};
pub use labels::{CableStatus, FlowControl, LinkStatus, PortSpeed};
pub use models::{
    CablePairResult, CableTestResult, PortInfo, PortStatistics, VlanInfo, VlanMembership,
};
pub use session::{Session, SessionState, SwitchConfig};
pub use switch::{DEFAULT_PORT_COUNT, SwitchClient};
pub use transport::{TlsMode, TransportConfig};
