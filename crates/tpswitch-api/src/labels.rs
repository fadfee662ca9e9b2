// Code → label tables
//
// The switch reports port speed, flow control, link state and cable
// status as small integer codes. Each table is a closed enum with an
// explicit fallback variant for codes outside the known range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Look up `values[index]` and map it through `from_code`, falling back
/// to `unknown` when the index is past the end of the array.
pub(crate) fn label_at<T>(values: &[i64], index: usize, from_code: fn(i64) -> T, unknown: T) -> T {
    values.get(index).copied().map_or(unknown, from_code)
}

/// Configured or negotiated port speed (`spd_cfg` / `spd_act`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortSpeed {
    #[serde(rename = "Link Down")]
    LinkDown,
    #[serde(rename = "Auto")]
    Auto,
    #[serde(rename = "10MH")]
    Half10,
    #[serde(rename = "10MF")]
    Full10,
    #[serde(rename = "100MH")]
    Half100,
    #[serde(rename = "100MF")]
    Full100,
    #[serde(rename = "1000MF")]
    Full1000,
    /// Code 7, which the web UI renders as an empty cell.
    #[serde(rename = "")]
    Blank,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl PortSpeed {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::LinkDown,
            1 => Self::Auto,
            2 => Self::Half10,
            3 => Self::Full10,
            4 => Self::Half100,
            5 => Self::Full100,
            6 => Self::Full1000,
            7 => Self::Blank,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LinkDown => "Link Down",
            Self::Auto => "Auto",
            Self::Half10 => "10MH",
            Self::Full10 => "10MF",
            Self::Half100 => "100MH",
            Self::Full100 => "100MF",
            Self::Full1000 => "1000MF",
            Self::Blank => "",
            Self::Unknown => "Unknown",
        }
    }
}

/// Flow-control setting (`fc_cfg` / `fc_act`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowControl {
    Off,
    On,
    Unknown,
}

impl FlowControl {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Off,
            1 => Self::On,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
            Self::Unknown => "Unknown",
        }
    }
}

/// Link state shown on the statistics page (`link_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    #[serde(rename = "Link Down")]
    LinkDown,
    #[serde(rename = "Auto")]
    Auto,
    #[serde(rename = "10M Half")]
    Half10,
    #[serde(rename = "10M Full")]
    Full10,
    #[serde(rename = "100M Half")]
    Half100,
    #[serde(rename = "100M Full")]
    Full100,
    #[serde(rename = "1000M Full")]
    Full1000,
    #[serde(rename = "")]
    Blank,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl LinkStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::LinkDown,
            1 => Self::Auto,
            2 => Self::Half10,
            3 => Self::Full10,
            4 => Self::Half100,
            5 => Self::Full100,
            6 => Self::Full1000,
            7 => Self::Blank,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LinkDown => "Link Down",
            Self::Auto => "Auto",
            Self::Half10 => "10M Half",
            Self::Full10 => "10M Full",
            Self::Half100 => "100M Half",
            Self::Full100 => "100M Full",
            Self::Full1000 => "1000M Full",
            Self::Blank => "",
            Self::Unknown => "Unknown",
        }
    }
}

/// Cable diagnostic verdict (`cablestate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CableStatus {
    /// Code -1: the port was not tested.
    #[serde(rename = "--")]
    NotTested,
    #[serde(rename = "No Cable")]
    NoCable,
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Open")]
    Open,
    #[serde(rename = "Short")]
    Short,
    #[serde(rename = "Open & Short")]
    OpenShort,
    #[serde(rename = "Cross Cable")]
    CrossCable,
    #[serde(rename = "Others")]
    Others,
}

impl CableStatus {
    pub const NOT_TESTED_CODE: i64 = -1;

    pub fn from_code(code: i64) -> Self {
        match code {
            Self::NOT_TESTED_CODE => Self::NotTested,
            0 => Self::NoCable,
            1 => Self::Normal,
            2 => Self::Open,
            3 => Self::Short,
            4 => Self::OpenShort,
            5 => Self::CrossCable,
            _ => Self::Others,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotTested => "--",
            Self::NoCable => "No Cable",
            Self::Normal => "Normal",
            Self::Open => "Open",
            Self::Short => "Short",
            Self::OpenShort => "Open & Short",
            Self::CrossCable => "Cross Cable",
            Self::Others => "Others",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

display_label!(PortSpeed, FlowControl, LinkStatus, CableStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_labels_follow_code_table() {
        let labels: Vec<&str> = (0..8).map(|c| PortSpeed::from_code(c).label()).collect();
        assert_eq!(
            labels,
            ["Link Down", "Auto", "10MH", "10MF", "100MH", "100MF", "1000MF", ""]
        );
    }

    #[test]
    fn link_status_labels_follow_code_table() {
        let labels: Vec<&str> = (0..8).map(|c| LinkStatus::from_code(c).label()).collect();
        assert_eq!(
            labels,
            [
                "Link Down",
                "Auto",
                "10M Half",
                "10M Full",
                "100M Half",
                "100M Full",
                "1000M Full",
                ""
            ]
        );
    }

    #[test]
    fn out_of_range_codes_are_unknown() {
        for code in [-1, 8, 99, i64::MIN] {
            assert_eq!(PortSpeed::from_code(code).label(), "Unknown");
            assert_eq!(LinkStatus::from_code(code).label(), "Unknown");
        }
        assert_eq!(FlowControl::from_code(2).label(), "Unknown");
        assert_eq!(FlowControl::from_code(-1).label(), "Unknown");
    }

    #[test]
    fn index_past_array_is_unknown() {
        let values = [1, 0];
        assert_eq!(
            label_at(&values, 0, FlowControl::from_code, FlowControl::Unknown),
            FlowControl::On
        );
        assert_eq!(
            label_at(&values, 2, FlowControl::from_code, FlowControl::Unknown),
            FlowControl::Unknown
        );
        assert_eq!(
            label_at(&[], 0, PortSpeed::from_code, PortSpeed::Unknown),
            PortSpeed::Unknown
        );
    }

    #[test]
    fn cable_status_table() {
        let labels: Vec<&str> = (-1..=6).map(|c| CableStatus::from_code(c).label()).collect();
        assert_eq!(
            labels,
            [
                "--",
                "No Cable",
                "Normal",
                "Open",
                "Short",
                "Open & Short",
                "Cross Cable",
                "Others"
            ]
        );
        assert_eq!(CableStatus::from_code(-7), CableStatus::Others);
    }

    #[test]
    fn labels_serialize_as_display_text() {
        assert_eq!(PortSpeed::Full1000.to_string(), "1000MF");
        assert_eq!(
            serde_json::to_string(&CableStatus::OpenShort).ok().as_deref(),
            Some("\"Open & Short\"")
        );
        assert_eq!(
            serde_json::to_string(&LinkStatus::Full100).ok().as_deref(),
            Some("\"100M Full\"")
        );
    }
}
