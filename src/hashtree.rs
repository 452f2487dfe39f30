use std::collections::HashMap;

use crate::hash::{Blake3Engine, HashEngine};
use crate::proof::{AuditProof, ProofStep, Side};
use crate::storage::{MemStorage, Storage};
use crate::{Digest, Error, Index, Result};

/// Incremental binary hash tree over an append-only sequence of leaf hashes.
///
/// Leaf hashes live in the storage backend; internal levels are cached in memory and
/// updated along the O(log n) ancestor path of each appended leaf. At any level with an
/// odd number of nodes, the lone trailing node promotes itself one level without
/// rehashing, so the shape is balanced but not perfect and commitments are reproducible
/// across implementations that follow the same rule.
///
/// Commitments and proofs returned to callers are owned copies; a later append never
/// invalidates an already-returned value.
pub struct MerkleTree<S: Storage, E: HashEngine = Blake3Engine> {
  storage: S,
  engine: E,
  /// Cached internal levels, bottom-up. `levels[0]` is the level directly above the
  /// leaves; the last level holds exactly one node (the root) whenever size > 1.
  levels: Vec<Vec<Digest>>,
  /// First leaf index per digest. Duplicate records map to their earliest index.
  indices: HashMap<Digest, Index>,
}

impl MerkleTree<MemStorage> {
  /// Empty tree over fresh in-memory storage with the BLAKE3 engine.
  pub fn in_memory() -> Self {
    MerkleTree {
      storage: MemStorage::new(),
      engine: Blake3Engine,
      levels: Vec::new(),
      indices: HashMap::new(),
    }
  }
}

impl<S: Storage, E: HashEngine> MerkleTree<S, E> {
  /// Build a tree over `storage`, rebuilding the internal level cache and digest index
  /// from any leaf hashes it already contains.
  pub fn new(storage: S, engine: E) -> Result<Self> {
    let mut tree = MerkleTree { storage, engine, levels: Vec::new(), indices: HashMap::new() };
    tree.rebuild()?;
    Ok(tree)
  }

  fn rebuild(&mut self) -> Result<()> {
    self.levels.clear();
    self.indices.clear();
    let n = self.storage.len()?;
    let mut current = Vec::with_capacity(n as usize);
    for i in 0..n {
      let leaf = self.leaf(i)?;
      self.indices.entry(leaf).or_insert(i);
      current.push(leaf);
    }
    while current.len() > 1 {
      let next = current
        .chunks(2)
        .map(|pair| if let [left, right] = pair { self.engine.hash_node(left, right) } else { pair[0] })
        .collect::<Vec<_>>();
      self.levels.push(next.clone());
      current = next;
    }
    Ok(())
  }

  /// Hash `record` as a leaf and append it, returning the new 0-based index.
  pub fn append(&mut self, record: &[u8]) -> Result<Index> {
    self.append_leaf(self.engine.hash_leaf(record))
  }

  /// Append a pre-computed leaf digest. Callers that only ever see checksums, never raw
  /// records, feed the tree through this.
  pub fn append_leaf(&mut self, digest: Digest) -> Result<Index> {
    let index = self.storage.append(&digest)?;
    self.indices.entry(digest).or_insert(index);
    self.update_path(index, index + 1)?;
    Ok(index)
  }

  /// Recompute the ancestor chain of leaf `index` in a tree of `n` leaves. Only the
  /// trailing path changes on append, so this touches one node per level.
  fn update_path(&mut self, index: Index, n: u64) -> Result<()> {
    let mut idx = index;
    let mut count = n;
    let mut level = 0;
    while count > 1 {
      let parent = idx / 2;
      let left = self.node(level, parent * 2)?;
      let value = if parent * 2 + 1 < count {
        let right = self.node(level, parent * 2 + 1)?;
        self.engine.hash_node(&left, &right)
      } else {
        // lone trailing node promotes unchanged
        left
      };
      if self.levels.len() == level {
        self.levels.push(Vec::new());
      }
      let parents = &mut self.levels[level];
      if parent as usize == parents.len() {
        parents.push(value);
      } else {
        parents[parent as usize] = value;
      }
      idx = parent;
      count = count.div_ceil(2);
      level += 1;
    }
    Ok(())
  }

  /// Node digest at `level` (0 = leaves), reading leaves from storage and upper levels
  /// from the cache.
  fn node(&self, level: usize, index: Index) -> Result<Digest> {
    if level == 0 {
      self.leaf(index)
    } else {
      debug_assert!((index as usize) < self.levels[level - 1].len());
      Ok(self.levels[level - 1][index as usize])
    }
  }

  fn leaf(&self, index: Index) -> Result<Digest> {
    match self.storage.get(index)? {
      Some(hash) => Ok(hash),
      None => Err(Error::Storage(format!("leaf hash missing at index {index}"))),
    }
  }

  /// Current number of leaves.
  pub fn size(&self) -> Result<u64> {
    self.storage.len()
  }

  /// Digest of the leaf at `index`.
  pub fn leaf_digest(&self, index: Index) -> Result<Digest> {
    let size = self.size()?;
    if index >= size {
      return Err(Error::IndexOutOfRange { index, size });
    }
    self.leaf(index)
  }

  /// Whether a leaf with this digest has been appended.
  pub fn contains(&self, digest: &Digest) -> bool {
    self.indices.contains_key(digest)
  }

  /// Root hash at the current size. Fails with [`Error::EmptyTree`] when no leaves have
  /// been appended; there is no sentinel digest for the empty tree.
  pub fn commitment(&self) -> Result<Digest> {
    match self.size()? {
      0 => Err(Error::EmptyTree),
      1 => self.leaf(0),
      _ => {
        debug_assert!(self.levels.last().is_some_and(|top| top.len() == 1));
        self.node(self.levels.len(), 0)
      }
    }
  }

  /// Sibling path from leaf `leaf_index` to the root. Levels where the node is the
  /// unpaired trailing node contribute no entry. The tree size at the moment of the
  /// call is recorded in the proof; verification must use a commitment taken at that
  /// exact size.
  pub fn audit_proof(&self, leaf_index: Index) -> Result<AuditProof> {
    let size = self.size()?;
    if size == 0 {
      return Err(Error::EmptyTree);
    }
    if leaf_index >= size {
      return Err(Error::IndexOutOfRange { index: leaf_index, size });
    }
    let mut path = Vec::new();
    let mut idx = leaf_index;
    let mut count = size;
    let mut level = 0;
    while count > 1 {
      let sibling_idx = idx ^ 1;
      if sibling_idx < count {
        let side = if sibling_idx < idx { Side::Left } else { Side::Right };
        path.push(ProofStep { side, sibling: self.node(level, sibling_idx)? });
      }
      idx /= 2;
      count = count.div_ceil(2);
      level += 1;
    }
    Ok(AuditProof::new(leaf_index, size, path))
  }

  /// Proof for the first leaf whose digest equals `digest`. Duplicate records share a
  /// digest; the earliest index wins by convention.
  pub fn audit_proof_for_digest(&self, digest: &Digest) -> Result<AuditProof> {
    match self.indices.get(digest) {
      Some(&index) => self.audit_proof(index),
      None => Err(Error::DigestNotFound),
    }
  }
}

#[cfg(test)]
mod test;
