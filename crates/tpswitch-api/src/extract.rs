// Script-array extraction
//
// Switch pages carry their state in inline script literals such as
// `state: [1,1,0]` or `var cablestate = [1,-1,3]`. Report parsers read
// them through `ArrayExtractor`, so the matching strategy can change
// without touching the report logic.

use std::sync::LazyLock;

use regex::Regex;

/// Any named array: `var name = [..]` or `name: [..]`. The body may hold
/// single-quoted elements containing `]`.
static NAMED_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bvar\s+(\w+)\s*=|\b(\w+)\s*:)\s*\[((?:'[^']*'|[^\]'])*)\]")
        .expect("named-array pattern is valid")
});

/// Any named integer assignment: `var name = 24` or `name: 0x18`.
static NAMED_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bvar\s+(\w+)\s*=|\b(\w+)\s*:)\s*(-?(?:0[xX][0-9a-fA-F]+|\d+))")
        .expect("named-scalar pattern is valid")
});

/// Matches one single-quoted element inside an array body.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("quoted-element pattern is valid"));

/// Read named script values out of a page.
///
/// `None` means the name was not found at all; an array that exists but
/// is empty comes back as `Some(vec![])`.
pub trait ArrayExtractor {
    /// Integer array. Unparsable elements become 0.
    fn int_array(&self, name: &str) -> Option<Vec<i64>>;

    /// Unsigned array for counters. Negative or unparsable elements become 0.
    fn uint_array(&self, name: &str) -> Option<Vec<u64>>;

    /// Array of single-quoted strings, in order.
    fn string_array(&self, name: &str) -> Option<Vec<String>>;

    /// Single integer assignment (`var name = 24` or `name: 24`).
    fn int_scalar(&self, name: &str) -> Option<i64>;
}

/// Regex-backed extractor over a page body.
///
/// Both `name: [..]` (object property) and `var name = [..]` forms are
/// accepted; the first occurrence in the page wins.
#[derive(Debug, Clone, Copy)]
pub struct PageExtractor<'a> {
    page: &'a str,
}

impl<'a> PageExtractor<'a> {
    pub fn new(page: &'a str) -> Self {
        Self { page }
    }

    /// Value capture of the first `pattern` match whose identifier is `name`.
    fn named_value(&self, pattern: &Regex, name: &str) -> Option<&'a str> {
        pattern
            .captures_iter(self.page)
            .find(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .is_some_and(|m| m.as_str() == name)
            })
            .and_then(|caps| caps.get(3))
            .map(|m| m.as_str())
    }

    /// Non-empty, trimmed comma-separated elements of the first `name` array.
    fn elements(&self, name: &str) -> Option<impl Iterator<Item = &'a str>> {
        let body = self.named_value(&NAMED_ARRAY, name)?;
        Some(body.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }
}

impl ArrayExtractor for PageExtractor<'_> {
    fn int_array(&self, name: &str) -> Option<Vec<i64>> {
        Some(self.elements(name)?.map(parse_int).collect())
    }

    fn uint_array(&self, name: &str) -> Option<Vec<u64>> {
        Some(self.elements(name)?.map(parse_uint).collect())
    }

    fn string_array(&self, name: &str) -> Option<Vec<String>> {
        let body = self.named_value(&NAMED_ARRAY, name)?;
        Some(
            QUOTED
                .captures_iter(body)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_owned())
                .collect(),
        )
    }

    fn int_scalar(&self, name: &str) -> Option<i64> {
        self.named_value(&NAMED_SCALAR, name).map(parse_int)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
///
/// Anything that isn't a valid integer yields 0 instead of an error: one
/// garbled element must not sink the whole array.
pub fn parse_int(text: &str) -> i64 {
    let text = text.trim();
    match text.get(..2) {
        Some("0x" | "0X") => i64::from_str_radix(&text[2..], 16).unwrap_or(0),
        _ => text.parse().unwrap_or(0),
    }
}

/// Parse a non-negative decimal or hexadecimal integer over the full `u64`
/// range. Negative or invalid text yields 0.
pub fn parse_uint(text: &str) -> u64 {
    let text = text.trim();
    match text.get(..2) {
        Some("0x" | "0X") => u64::from_str_radix(&text[2..], 16).unwrap_or(0),
        _ => text.parse().unwrap_or(0),
    }
}

/// Decode a port-membership bitmask: bit `i` set means port `i + 1`.
///
/// Only the low 32 bits are considered. The result is ascending.
pub fn bitmask_to_ports(mask: i64) -> Vec<u32> {
    (0..32u32)
        .filter(|bit| (mask >> bit) & 1 == 1)
        .map(|bit| bit + 1)
        .collect()
}
