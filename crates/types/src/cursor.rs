use crate::ObjectKey;
use alloy::primitives::hex;
use std::{fmt, str::FromStr};

/// Message carried by every cursor parse failure.
pub const MALFORMED_CURSOR: &str = "Malformed cursor.";

/// Number of hex digits in the key field of a marker.
const KEY_HEX_LEN: usize = 64;

/// The client supplied a marker that does not have the
/// `<64 hex digits>,<decimal page>` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", MALFORMED_CURSOR)]
pub struct MalformedCursor;

/// Position in an owner directory traversal.
///
/// `(ZERO, 0)` is the terminal cursor: nothing is left to read. Any other
/// value means "find `last_index` on page `page` and continue after it".
///
/// The textual form, `<64 uppercase hex>,<decimal page>`, is handed to
/// clients as an opaque marker and must stay byte-stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AccountCursor {
    /// The last directory entry handed out.
    pub last_index: ObjectKey,
    /// The page on which `last_index` was found.
    pub page: u64,
}

impl AccountCursor {
    /// The terminal cursor.
    pub const TERMINAL: Self = Self { last_index: ObjectKey::ZERO, page: 0 };

    /// Create a new cursor.
    pub const fn new(last_index: ObjectKey, page: u64) -> Self {
        Self { last_index, page }
    }

    /// Whether no further objects exist after this cursor.
    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINAL
    }

    /// Whether this cursor asks to resume after a specific entry, rather
    /// than from the start of its page.
    pub fn has_resume_point(&self) -> bool {
        !self.last_index.is_zero()
    }

    /// Parse a client marker. An absent or empty marker starts from the
    /// head of the directory.
    pub fn parse(marker: Option<&str>) -> Result<Self, MalformedCursor> {
        match marker {
            None | Some("") => Ok(Self::TERMINAL),
            Some(marker) => marker.parse(),
        }
    }

    /// Format as the wire marker. Inverse of [`AccountCursor::parse`].
    pub fn to_marker(&self) -> String {
        self.to_string()
    }
}

impl FromStr for AccountCursor {
    type Err = MalformedCursor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, page) = s.split_once(',').ok_or(MalformedCursor)?;
        if page.contains(',') {
            return Err(MalformedCursor);
        }

        if index.len() != KEY_HEX_LEN || !index.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MalformedCursor);
        }
        let last_index = hex::decode_to_array::<_, 32>(index).map_err(|_| MalformedCursor)?;

        if page.is_empty() || !page.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedCursor);
        }
        let page = page.parse::<u64>().map_err(|_| MalformedCursor)?;

        Ok(Self::new(ObjectKey::from(last_index), page))
    }
}

impl fmt::Display for AccountCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", hex::encode_upper(self.last_index), self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;
    use proptest::prelude::*;

    const INDEX1: &str = "E6DBAFC99223B42257915A63DFC6B0C032D4070F9A574B255AD97466726FC321";

    #[test]
    fn empty_marker_starts_at_head() {
        assert_eq!(AccountCursor::parse(None).unwrap(), AccountCursor::TERMINAL);
        assert_eq!(AccountCursor::parse(Some("")).unwrap(), AccountCursor::TERMINAL);
    }

    #[test]
    fn parse_valid_marker() {
        let cursor = AccountCursor::parse(Some(&format!("{INDEX1},99"))).unwrap();
        assert_eq!(
            cursor.last_index,
            b256!("E6DBAFC99223B42257915A63DFC6B0C032D4070F9A574B255AD97466726FC321")
        );
        assert_eq!(cursor.page, 99);
        assert!(cursor.has_resume_point());
    }

    #[test]
    fn lowercase_hex_is_accepted() {
        let upper = AccountCursor::parse(Some(&format!("{INDEX1},1"))).unwrap();
        let lower = AccountCursor::parse(Some(&format!("{},1", INDEX1.to_lowercase()))).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn terminal_formats_as_zeroes() {
        assert_eq!(
            AccountCursor::TERMINAL.to_marker(),
            "0000000000000000000000000000000000000000000000000000000000000000,0"
        );
        assert!(AccountCursor::TERMINAL.is_terminal());
    }

    #[test]
    fn format_is_uppercase() {
        let cursor = AccountCursor::new(INDEX1.parse().unwrap(), 7);
        assert_eq!(cursor.to_marker(), format!("{INDEX1},7"));
    }

    #[test]
    fn malformed_markers() {
        let short = &INDEX1[..63];
        let cases = [
            "nothex,10".to_string(),
            "nothex,abc".to_string(),
            INDEX1.to_string(),
            format!("{INDEX1},"),
            format!("{INDEX1},-1"),
            format!("{INDEX1},1.5"),
            format!("{INDEX1},1,2"),
            format!("{short},1"),
            format!("{short}G,1"),
            format!("0x{},1", &INDEX1[..62]),
            format!("{INDEX1},18446744073709551616"),
        ];
        for case in cases {
            let err = AccountCursor::parse(Some(&case)).unwrap_err();
            assert_eq!(err.to_string(), MALFORMED_CURSOR, "{case}");
        }
    }

    proptest! {
        #[test]
        fn format_then_parse_is_identity(bytes in any::<[u8; 32]>(), page in any::<u64>()) {
            let cursor = AccountCursor::new(ObjectKey::from(bytes), page);
            prop_assert_eq!(AccountCursor::parse(Some(&cursor.to_marker())).unwrap(), cursor);
        }
    }
}
