use crate::Digest;

/// Prefix byte hashed ahead of a raw record.
pub const LEAF_TAG: u8 = 0x00;

/// Prefix byte hashed ahead of a pair of child digests.
pub const NODE_TAG: u8 = 0x01;

/// Deterministic digest function with distinct encodings for leaves and internal nodes.
///
/// The two tag bytes keep the leaf and node input spaces disjoint, so an internal node
/// can never collide with a leaf of equal length. Implementations must be pure and
/// stateless; digest length is fixed for the lifetime of a tree.
pub trait HashEngine: Send + Sync {
  /// Digest of a raw record, as stored at the lowest level of the tree.
  fn hash_leaf(&self, record: &[u8]) -> Digest;

  /// Digest of an internal node. Order matters: `hash_node(a, b) != hash_node(b, a)`
  /// in general.
  fn hash_node(&self, left: &Digest, right: &Digest) -> Digest;
}

/// BLAKE3-backed [`HashEngine`] producing 256-bit digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Engine;

impl HashEngine for Blake3Engine {
  fn hash_leaf(&self, record: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_TAG]);
    hasher.update(record);
    *hasher.finalize().as_bytes()
  }

  fn hash_node(&self, left: &Digest, right: &Digest) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[NODE_TAG]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
  }
}
