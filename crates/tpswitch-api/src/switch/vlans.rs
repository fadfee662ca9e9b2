// 802.1Q VLAN table, VLAN edits, and port PVID
//
// `Vlan8021QRpm.htm` lists VLANs as parallel `vids` / `names` /
// `tagMbrs` / `untagMbrs` arrays; membership masks use bit `i` for
// port `i + 1`. Edits go through `qvlanSet.cgi` and `vlanPvidSet.cgi`
// as GET query strings.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;
use url::form_urlencoded;

use super::{
    PVID_SET_CGI, SwitchClient, VLAN_PAGE, VLAN_SET_CGI, absorb_command, absorb_report,
};
use crate::error::Error;
use crate::extract::{ArrayExtractor, bitmask_to_ports};
use crate::models::{VlanInfo, VlanMembership};

/// Highest port a 32-bit membership mask can address.
const MAX_MASK_PORT: u32 = 32;

impl SwitchClient {
    /// All configured 802.1Q VLANs.
    ///
    /// `GET /Vlan8021QRpm.htm`
    pub async fn get_vlans(&self) -> Vec<VlanInfo> {
        absorb_report("get_vlans", self.try_get_vlans().await)
    }

    pub async fn try_get_vlans(&self) -> Result<Vec<VlanInfo>, Error> {
        debug!("fetching VLAN table");
        self.read_report(VLAN_PAGE, |page| parse_vlans(page)).await
    }

    /// Create a VLAN, or overwrite an existing one with the same id.
    ///
    /// Every port from 1 to `port_count` (the client's configured count
    /// when `None`) is sent; ports missing from `memberships` are removed
    /// from the VLAN.
    ///
    /// `GET /qvlanSet.cgi?vid=..&vname=..&selType_N=..&qvlan_add=Add%2FModify`
    pub async fn create_or_modify_vlan(
        &self,
        vlan_id: u16,
        name: &str,
        memberships: &HashMap<u32, VlanMembership>,
        port_count: Option<u32>,
    ) -> bool {
        absorb_command(
            "create_or_modify_vlan",
            self.try_create_or_modify_vlan(vlan_id, name, memberships, port_count)
                .await,
        )
    }

    pub async fn try_create_or_modify_vlan(
        &self,
        vlan_id: u16,
        name: &str,
        memberships: &HashMap<u32, VlanMembership>,
        port_count: Option<u32>,
    ) -> Result<(), Error> {
        let port_count = port_count.unwrap_or(self.port_count());
        debug!(vlan_id, name, port_count, "creating or modifying VLAN");
        let query = vlan_set_query(vlan_id, name, memberships, port_count);
        self.send_get_command(&format!("{VLAN_SET_CGI}?{query}"))
            .await
    }

    /// Delete a VLAN.
    ///
    /// `GET /qvlanSet.cgi?selVlans=..&qvlan_del=Delete`
    pub async fn delete_vlan(&self, vlan_id: u16) -> bool {
        absorb_command("delete_vlan", self.try_delete_vlan(vlan_id).await)
    }

    pub async fn try_delete_vlan(&self, vlan_id: u16) -> Result<(), Error> {
        debug!(vlan_id, "deleting VLAN");
        let query = vlan_delete_query(vlan_id);
        self.send_get_command(&format!("{VLAN_SET_CGI}?{query}"))
            .await
    }

    /// Set the VLAN that untagged ingress frames on `port` are assigned to.
    ///
    /// `GET /vlanPvidSet.cgi?pbm=..&pvid=..`
    pub async fn set_port_pvid(&self, port: u32, vlan_id: u16) -> bool {
        absorb_command("set_port_pvid", self.try_set_port_pvid(port, vlan_id).await)
    }

    pub async fn try_set_port_pvid(&self, port: u32, vlan_id: u16) -> Result<(), Error> {
        debug!(port, vlan_id, "setting port PVID");
        let query = pvid_query(port, vlan_id)?;
        self.send_get_command(&format!("{PVID_SET_CGI}?{query}"))
            .await
    }
}

/// Query string for adding or modifying a VLAN.
pub fn vlan_set_query(
    vlan_id: u16,
    name: &str,
    memberships: &HashMap<u32, VlanMembership>,
    port_count: u32,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("vid", &vlan_id.to_string())
        .append_pair("vname", name);
    for port in 1..=port_count {
        let membership = memberships.get(&port).copied().unwrap_or_default();
        query.append_pair(&format!("selType_{port}"), &membership.code().to_string());
    }
    query.append_pair("qvlan_add", "Add/Modify").finish()
}

/// Query string for deleting a VLAN.
pub fn vlan_delete_query(vlan_id: u16) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("selVlans", &vlan_id.to_string())
        .append_pair("qvlan_del", "Delete")
        .finish()
}

/// Query string for setting one port's PVID.
///
/// `pbm` is a port bitmask with only `port`'s bit set.
pub fn pvid_query(port: u32, vlan_id: u16) -> Result<String, Error> {
    if !(1..=MAX_MASK_PORT).contains(&port) {
        return Err(Error::InvalidArgument(format!(
            "port {port} outside 1..={MAX_MASK_PORT}"
        )));
    }
    let pbm = 1u64 << (port - 1);
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair("pbm", &pbm.to_string())
        .append_pair("pvid", &vlan_id.to_string())
        .finish())
}

/// Parse the 802.1Q VLAN page.
///
/// One record per `vids` entry; a missing name or mask for that position
/// reads as empty.
pub fn parse_vlans(page: &impl ArrayExtractor) -> Result<Vec<VlanInfo>, Error> {
    let vids = page
        .int_array("vids")
        .ok_or(Error::MissingArray { name: "vids" })?;
    let names = page.string_array("names").unwrap_or_default();
    let tag_mbrs = page.int_array("tagMbrs").unwrap_or_default();
    let untag_mbrs = page.int_array("untagMbrs").unwrap_or_default();

    let vlans = vids
        .iter()
        .enumerate()
        .map(|(i, &vid)| {
            let tagged_ports = bitmask_to_ports(tag_mbrs.get(i).copied().unwrap_or(0));
            let untagged_ports = bitmask_to_ports(untag_mbrs.get(i).copied().unwrap_or(0));
            let member_ports = sorted_union(&tagged_ports, &untagged_ports);
            VlanInfo {
                vlan_id: u16::try_from(vid).unwrap_or_default(),
                name: names.get(i).cloned().unwrap_or_default(),
                tagged_ports,
                untagged_ports,
                member_ports,
            }
        })
        .collect();

    Ok(vlans)
}

fn sorted_union(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter()
        .chain(b)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
