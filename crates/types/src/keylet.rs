//! Deterministic derivation of ledger object keys.
//!
//! Every object key is the first half of a SHA-512 digest over a two-byte
//! namespace tag followed by the fields that identify the object. The
//! functions here are pure: the same inputs always produce the same key.

use crate::{AccountId, ObjectKey};
use sha2::{Digest, Sha512};

/// Namespace tag for account root objects.
const SPACE_ACCOUNT: u16 = b'a' as u16;

/// Namespace tag for owner directory roots.
const SPACE_OWNER_DIR: u16 = b'O' as u16;

/// Namespace tag for non-root directory pages.
const SPACE_DIR_NODE: u16 = b'd' as u16;

/// First 256 bits of a SHA-512 digest over the concatenated parts.
pub fn sha512_half(parts: &[&[u8]]) -> ObjectKey {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    ObjectKey::from_slice(&hasher.finalize()[..32])
}

/// Key of the account root object for `account`.
pub fn account(account: &AccountId) -> ObjectKey {
    sha512_half(&[&SPACE_ACCOUNT.to_be_bytes(), account.as_ref()])
}

/// Key of the first page of the owner directory for `account`.
pub fn owner_dir(account: &AccountId) -> ObjectKey {
    sha512_half(&[&SPACE_OWNER_DIR.to_be_bytes(), account.as_ref()])
}

/// Key of page `page` of the directory rooted at `root`.
///
/// Page `0` is the root itself.
pub fn page(root: &ObjectKey, page: u64) -> ObjectKey {
    if page == 0 {
        return *root;
    }
    sha512_half(&[&SPACE_DIR_NODE.to_be_bytes(), root.as_slice(), &page.to_be_bytes()])
}
