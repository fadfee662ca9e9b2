// Cable diagnostics
//
// `cable_diag_get.cgi` runs the test on the checked ports and answers
// with `var cablestate = [..]` / `var cablelength = [..]`, indexed by
// `port - 1` across all ports. Untested ports carry state -1.

use tracing::debug;
use url::form_urlencoded;

use super::{CABLE_DIAG_CGI, SwitchClient, absorb_report};
use crate::error::Error;
use crate::extract::ArrayExtractor;
use crate::labels::CableStatus;
use crate::models::{CablePairResult, CableTestResult};

impl SwitchClient {
    /// Run a cable test on `ports` and return results for the ports the
    /// switch actually tested.
    ///
    /// `GET /cable_diag_get.cgi?chk_N=N&..&Apply=Apply`
    pub async fn run_cable_test(&self, ports: &[u32]) -> Vec<CableTestResult> {
        absorb_report("run_cable_test", self.try_run_cable_test(ports).await)
    }

    pub async fn try_run_cable_test(&self, ports: &[u32]) -> Result<Vec<CableTestResult>, Error> {
        let ports = dedup_ports(ports);
        if ports.is_empty() {
            return Ok(Vec::new());
        }

        debug!(?ports, "running cable test");
        let query = cable_test_query(&ports);
        self.read_report(&format!("{CABLE_DIAG_CGI}?{query}"), |page| {
            parse_cable_test(page, &ports)
        })
        .await
    }
}

/// Requested ports in order, first occurrence kept.
fn dedup_ports(ports: &[u32]) -> Vec<u32> {
    let mut seen = Vec::with_capacity(ports.len());
    for &port in ports {
        if !seen.contains(&port) {
            seen.push(port);
        }
    }
    seen
}

/// Query string that checks each port in the diagnostics form.
pub fn cable_test_query(ports: &[u32]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for port in ports {
        let port = port.to_string();
        query.append_pair(&format!("chk_{port}"), &port);
    }
    query.append_pair("Apply", "Apply").finish()
}

/// Parse a cable diagnostics response for the requested `ports`.
///
/// Ports the switch marks as untested, or that fall outside the reported
/// arrays, are left out.
pub fn parse_cable_test(
    page: &impl ArrayExtractor,
    ports: &[u32],
) -> Result<Vec<CableTestResult>, Error> {
    let states = page
        .int_array("cablestate")
        .ok_or(Error::MissingArray { name: "cablestate" })?;
    let lengths = page
        .int_array("cablelength")
        .ok_or(Error::MissingArray {
            name: "cablelength",
        })?;

    let results = ports
        .iter()
        .filter_map(|&port| {
            let index = usize::try_from(port.checked_sub(1)?).ok()?;
            let code = *states.get(index)?;
            let length = *lengths.get(index)?;
            if code == CableStatus::NOT_TESTED_CODE {
                return None;
            }
            Some(cable_result(port, CableStatus::from_code(code), length))
        })
        .collect();

    Ok(results)
}

fn cable_result(port: u32, status: CableStatus, raw_length: i64) -> CableTestResult {
    let cable_length = u32::try_from(raw_length.max(0)).unwrap_or(u32::MAX);
    CableTestResult {
        port,
        status,
        pairs: [1, 2, 3, 4].map(|pair| CablePairResult {
            pair,
            status,
            length: cable_length,
        }),
        cable_length,
        completed: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extract::PageExtractor;

    const DIAG_PAGE: &str = r"
<script>
var cablestate = [1,-1,3];
var cablelength = [50,0,0];
</script>";

    #[test]
    fn skips_untested_ports() {
        let results = parse_cable_test(&PageExtractor::new(DIAG_PAGE), &[1, 2, 3]).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].port, 1);
        assert_eq!(results[0].status, CableStatus::Normal);
        assert_eq!(results[0].cable_length, 50);
        assert_eq!(results[1].port, 3);
        assert_eq!(results[1].status, CableStatus::Short);
        assert_eq!(results[1].cable_length, 0);
        assert!(results.iter().all(|r| r.completed));
    }

    #[test]
    fn pairs_repeat_the_aggregate_result() {
        let results = parse_cable_test(&PageExtractor::new(DIAG_PAGE), &[1]).unwrap();
        let pairs = &results[0].pairs;

        assert_eq!(pairs.iter().map(|p| p.pair).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(
            pairs
                .iter()
                .all(|p| p.status == CableStatus::Normal && p.length == 50)
        );
    }

    #[test]
    fn only_requested_ports_are_reported() {
        let results = parse_cable_test(&PageExtractor::new(DIAG_PAGE), &[3]).unwrap();
        assert_eq!(results.iter().map(|r| r.port).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn negative_length_clamps_to_zero() {
        let page = "var cablestate = [2, 9]; var cablelength = [-3, 12];";
        let results = parse_cable_test(&PageExtractor::new(page), &[1, 2]).unwrap();
        assert_eq!(results[0].status, CableStatus::Open);
        assert_eq!(results[0].cable_length, 0);
        assert_eq!(results[1].status, CableStatus::Others);
        assert_eq!(results[1].cable_length, 12);
    }

    #[test]
    fn out_of_range_ports_are_skipped() {
        let results = parse_cable_test(&PageExtractor::new(DIAG_PAGE), &[0, 4, 99]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn missing_arrays_are_errors() {
        let only_state = "var cablestate = [1];";
        assert!(matches!(
            parse_cable_test(&PageExtractor::new(only_state), &[1]),
            Err(Error::MissingArray {
                name: "cablelength"
            })
        ));
        assert!(matches!(
            parse_cable_test(&PageExtractor::new("<html/>"), &[1]),
            Err(Error::MissingArray { name: "cablestate" })
        ));
    }

    #[test]
    fn query_checks_each_port() {
        assert_eq!(
            cable_test_query(&[1, 5, 12]),
            "chk_1=1&chk_5=5&chk_12=12&Apply=Apply"
        );
    }

    #[test]
    fn duplicate_ports_are_requested_once() {
        assert_eq!(dedup_ports(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
