//! Content identifier computation.

use cid::Cid;
use multihash::{Code, MultihashDigest};

/// Multicodec code for raw binary blocks.
const RAW_CODEC: u64 = 0x55;

/// Compute the CIDv1 of a byte buffer (raw codec, SHA2-256).
///
/// Pure function of the input: the same bytes always yield the same
/// identifier, whether they came from disk or memory.
pub fn compute_cid(bytes: &[u8]) -> Cid {
    Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(bytes))
}
