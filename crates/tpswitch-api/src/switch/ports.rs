// Port settings, statistics, and enable/disable
//
// `PortSettingRpm.htm` and `PortStatisticsRpm.htm` both describe ports
// as parallel arrays indexed by `port - 1`, bounded by `max_port_num`.

use tracing::debug;
use url::form_urlencoded;

use super::{
    PORT_SETTING_CGI, PORT_SETTINGS_PAGE, PORT_STATISTICS_PAGE, SwitchClient, absorb_command,
    absorb_report,
};
use crate::error::Error;
use crate::extract::ArrayExtractor;
use crate::labels::{FlowControl, LinkStatus, PortSpeed, label_at};
use crate::models::{PortInfo, PortStatistics};

/// Speed / flow-control value that tells the switch to keep its setting.
const UNCHANGED: &str = "7";

/// Number of `pkts` slots per port: TX good, TX bad, RX good, RX bad.
const COUNTERS_PER_PORT: usize = 4;

impl SwitchClient {
    /// Port configuration and negotiated link parameters.
    ///
    /// `GET /PortSettingRpm.htm`
    pub async fn get_port_status(&self) -> Vec<PortInfo> {
        absorb_report("get_port_status", self.try_get_port_status().await)
    }

    pub async fn try_get_port_status(&self) -> Result<Vec<PortInfo>, Error> {
        debug!("fetching port settings");
        self.read_report(PORT_SETTINGS_PAGE, |page| parse_port_settings(page))
            .await
    }

    /// Per-port link state and packet counters.
    ///
    /// `GET /PortStatisticsRpm.htm`
    pub async fn get_port_statistics(&self) -> Vec<PortStatistics> {
        absorb_report(
            "get_port_statistics",
            self.try_get_port_statistics().await,
        )
    }

    pub async fn try_get_port_statistics(&self) -> Result<Vec<PortStatistics>, Error> {
        debug!("fetching port statistics");
        self.read_report(PORT_STATISTICS_PAGE, |page| parse_port_statistics(page))
            .await
    }

    /// Enable or disable a port, leaving speed and flow control untouched.
    ///
    /// `POST /port_setting.cgi`
    pub async fn set_port_state(&self, port: u32, enable: bool) -> bool {
        absorb_command("set_port_state", self.try_set_port_state(port, enable).await)
    }

    pub async fn try_set_port_state(&self, port: u32, enable: bool) -> Result<(), Error> {
        debug!(port, enable, "setting port state");
        let body = port_state_body(port, enable);
        self.send_post_command(PORT_SETTING_CGI, &body).await
    }
}

/// Form body for `port_setting.cgi`.
pub fn port_state_body(port: u32, enable: bool) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("portid", &port.to_string())
        .append_pair("state", if enable { "1" } else { "0" })
        .append_pair("speed", UNCHANGED)
        .append_pair("flowcontrol", UNCHANGED)
        .append_pair("apply", "Apply")
        .finish()
}

fn max_port_num(page: &impl ArrayExtractor) -> Result<usize, Error> {
    page.int_scalar("max_port_num")
        .map(|n| usize::try_from(n).unwrap_or(0))
        .ok_or(Error::MissingArray {
            name: "max_port_num",
        })
}

/// Parse the port settings page.
///
/// One record per port up to `max_port_num`, stopping early if the
/// `state` array is shorter.
pub fn parse_port_settings(page: &impl ArrayExtractor) -> Result<Vec<PortInfo>, Error> {
    let max_ports = max_port_num(page)?;

    let state = page.int_array("state").unwrap_or_default();
    let trunk_info = page.int_array("trunk_info").unwrap_or_default();
    let spd_cfg = page.int_array("spd_cfg").unwrap_or_default();
    let spd_act = page.int_array("spd_act").unwrap_or_default();
    let fc_cfg = page.int_array("fc_cfg").unwrap_or_default();
    let fc_act = page.int_array("fc_act").unwrap_or_default();

    let ports = state
        .iter()
        .take(max_ports)
        .zip(1u32..)
        .enumerate()
        .map(|(i, (&enabled, port))| PortInfo {
            port,
            enabled: enabled == 1,
            configured_speed: label_at(&spd_cfg, i, PortSpeed::from_code, PortSpeed::Unknown),
            actual_speed: label_at(&spd_act, i, PortSpeed::from_code, PortSpeed::Unknown),
            configured_flow_control: label_at(
                &fc_cfg,
                i,
                FlowControl::from_code,
                FlowControl::Unknown,
            ),
            actual_flow_control: label_at(&fc_act, i, FlowControl::from_code, FlowControl::Unknown),
            lag_group: trunk_info.get(i).copied().unwrap_or(0),
        })
        .collect();

    Ok(ports)
}

/// Parse the port statistics page.
pub fn parse_port_statistics(page: &impl ArrayExtractor) -> Result<Vec<PortStatistics>, Error> {
    let max_ports = max_port_num(page)?;

    let state = page.int_array("state").unwrap_or_default();
    let link_status = page.int_array("link_status").unwrap_or_default();
    let pkts = page.uint_array("pkts").unwrap_or_default();

    let counter = |port_index: usize, slot: usize| -> u64 {
        pkts.get(port_index * COUNTERS_PER_PORT + slot)
            .copied()
            .unwrap_or(0)
    };

    let stats = state
        .iter()
        .take(max_ports)
        .zip(1u32..)
        .enumerate()
        .map(|(i, (&enabled, port))| PortStatistics {
            port,
            enabled: enabled == 1,
            link_status: label_at(&link_status, i, LinkStatus::from_code, LinkStatus::Unknown),
            tx_good_packets: counter(i, 0),
            tx_bad_packets: counter(i, 1),
            rx_good_packets: counter(i, 2),
            rx_bad_packets: counter(i, 3),
        })
        .collect();

    Ok(stats)
}
