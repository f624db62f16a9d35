//! CID (Content Identifier) utilities
//!
//! Shape validation for identifiers arriving over HTTP, and local CID
//! generation for the in-memory store.

use crate::{Result, StorageError};
use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw binary multicodec (0x55)
const RAW_CODEC: u64 = 0x55;

/// Number of characters following the multibase/version prefix
const CIDV0_BODY_LEN: usize = 44;
const CIDV1_BODY_LEN: usize = 55;

/// Human-readable hint returned alongside rejected identifiers
pub const EXPECTED_CID_FORMAT: &str =
    "CIDs should start with Qm, bafy, bafk, or baf followed by alphanumeric characters";

/// Base58btc alphabet: no `0`, `I`, `O` or `l`
fn is_base58(c: char) -> bool {
    matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
}

/// Lowercase RFC 4648 base32 alphabet
fn is_base32_lower(c: char) -> bool {
    matches!(c, 'a'..='z' | '2'..='7')
}

fn body_matches(body: &str, len: usize, allowed: fn(char) -> bool) -> bool {
    // All allowed characters are ASCII, so byte length equals char count on success.
    body.len() == len && body.chars().all(allowed)
}

/// Check whether `s` has one of the accepted CID shapes.
///
/// Accepted forms:
/// - `Qm` + 44 base58 characters (CIDv0)
/// - `bafy` + 55 lowercase base32 characters
/// - `bafk` + 55 lowercase base32 characters
/// - `baf` + 55 lowercase base32 characters (any other `baf` prefix)
///
/// This is a shape check only; it does not decode the multihash.
pub fn is_valid_cid(s: &str) -> bool {
    if let Some(body) = s.strip_prefix("Qm") {
        return body_matches(body, CIDV0_BODY_LEN, is_base58);
    }

    // Longest prefix wins: a `bafy`/`bafk` string is never re-read as `baf` + 55.
    let body = s
        .strip_prefix("bafy")
        .or_else(|| s.strip_prefix("bafk"))
        .or_else(|| s.strip_prefix("baf"));

    body.is_some_and(|body| body_matches(body, CIDV1_BODY_LEN, is_base32_lower))
}

/// A validated content identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Parse and validate an identifier
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if is_valid_cid(&s) {
            Ok(Self(s))
        } else {
            Err(StorageError::InvalidCid(s))
        }
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://` URI for this identifier
    pub fn to_uri(&self) -> String {
        format!("ipfs://{}", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Cid> for ContentId {
    fn from(cid: Cid) -> Self {
        // CIDv1 renders as base32 lowercase `b...`, v0 as base58 `Qm...`.
        Self(cid.to_string())
    }
}

impl TryFrom<String> for ContentId {
    type Error = StorageError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

/// Create a CIDv1 (raw codec, sha2-256) for `data`
pub fn create_cid(data: &[u8]) -> Cid {
    let multihash = Code::Sha2_256.digest(data);
    Cid::new_v1(RAW_CODEC, multihash)
}
