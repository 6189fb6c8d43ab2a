use crate::{AccountId, DeserError, ObjectKey};
use alloy::primitives::Bytes;
use bytes::{Buf, BufMut, BytesMut};

/// Size of the fixed header preceding the entries: owner, root index,
/// next page, previous page, entry count.
const HEADER_SIZE: usize = 20 + 32 + 8 + 8 + 4;

/// One page of an account's owner directory.
///
/// A directory is a singly linked chain of pages. Page `0` is the root,
/// stored at [`keylet::owner_dir`]; every other page `n` is stored at
/// [`keylet::page`]`(root, n)`. `next_page == 0` marks the last page.
///
/// [`keylet::owner_dir`]: crate::keylet::owner_dir
/// [`keylet::page`]: crate::keylet::page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryPage {
    /// Account that owns the directory.
    pub owner: AccountId,
    /// Key of the directory root page.
    pub root_index: ObjectKey,
    /// Keys of the objects listed on this page, in directory order.
    pub entries: Vec<ObjectKey>,
    /// Number of the next page, or `0` if this is the last page.
    pub next_page: u64,
    /// Number of the previous page, or `0` for the root.
    pub previous_page: u64,
}

impl DirectoryPage {
    /// Create a page with the given entries and next-page link.
    pub const fn new(
        owner: AccountId,
        root_index: ObjectKey,
        entries: Vec<ObjectKey>,
        next_page: u64,
    ) -> Self {
        Self { owner, root_index, entries, next_page, previous_page: 0 }
    }

    /// Set the previous-page link.
    pub const fn with_previous_page(mut self, previous_page: u64) -> Self {
        self.previous_page = previous_page;
        self
    }

    /// Whether this is the last page of the chain.
    pub const fn is_last(&self) -> bool {
        self.next_page == 0
    }

    /// The encoded size of the page in bytes.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + self.entries.len() * 32
    }

    /// Serialize the page into bytes.
    pub fn encoded(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_size());
        buf.put_slice(self.owner.as_ref());
        buf.put_slice(self.root_index.as_slice());
        buf.put_u64(self.next_page);
        buf.put_u64(self.previous_page);
        buf.put_u32(self.entries.len() as u32);
        for entry in &self.entries {
            buf.put_slice(entry.as_slice());
        }
        buf.freeze().into()
    }

    /// Deserialize a page, requiring every byte to be consumed.
    pub fn decode(mut data: &[u8]) -> Result<Self, DeserError> {
        let total = data.len();
        if total < HEADER_SIZE {
            return Err(DeserError::InsufficientData { needed: HEADER_SIZE, available: total });
        }

        let mut owner = [0u8; 20];
        data.copy_to_slice(&mut owner);
        let root_index = ObjectKey::from_slice(&data[..32]);
        data.advance(32);
        let next_page = data.get_u64();
        let previous_page = data.get_u64();
        let count = data.get_u32() as usize;

        let needed = count * 32;
        if data.len() < needed {
            return Err(DeserError::InsufficientData { needed, available: data.len() });
        }
        if data.len() > needed {
            return Err(DeserError::InexactDeser { extra_bytes: data.len() - needed });
        }

        let entries = data.chunks_exact(32).map(ObjectKey::from_slice).collect();

        Ok(Self { owner: AccountId::new(owner), root_index, entries, next_page, previous_page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keylet;

    fn sample() -> DirectoryPage {
        let owner = AccountId::new([7; 20]);
        let root = keylet::owner_dir(&owner);
        DirectoryPage::new(owner, root, vec![ObjectKey::repeat_byte(1), ObjectKey::repeat_byte(2)], 4)
            .with_previous_page(3)
    }

    #[test]
    fn decode_encoded_page() {
        let page = sample();
        let bytes = page.encoded();
        assert_eq!(bytes.len(), page.encoded_size());
        assert_eq!(DirectoryPage::decode(&bytes).unwrap(), page);
        assert!(!page.is_last());
    }

    #[test]
    fn truncated_header() {
        let err = DirectoryPage::decode(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, DeserError::InsufficientData { needed: HEADER_SIZE, available: 10 }));
    }

    #[test]
    fn truncated_entries() {
        let bytes = sample().encoded();
        let err = DirectoryPage::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, DeserError::InsufficientData { needed: 64, available: 63 }));
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = sample().encoded().to_vec();
        bytes.push(0);
        let err = DirectoryPage::decode(&bytes).unwrap_err();
        assert!(matches!(err, DeserError::InexactDeser { extra_bytes: 1 }));
    }
}
