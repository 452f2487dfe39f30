use std::sync::{Arc, RwLock};

use crate::{Digest, Index, Result};

/// Ordered, append-only sequence of leaf hashes backing a tree.
///
/// Index 0 is the first appended hash. Implementations over files or databases can be
/// swapped in without changing the tree's public contract.
pub trait Storage {
  /// Append a leaf hash and return its new index.
  fn append(&mut self, hash: &Digest) -> Result<Index>;

  /// Retrieve the hash at `index`, or `None` if the index has not been assigned.
  fn get(&self, index: Index) -> Result<Option<Digest>>;

  /// Current number of stored leaf hashes.
  fn len(&self) -> Result<u64>;

  fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }
}

/// In-memory [`Storage`] over a shared vector. Cloned handles refer to the same
/// underlying sequence.
pub struct MemStorage {
  hashes: Arc<RwLock<Vec<Digest>>>,
}

impl MemStorage {
  pub fn new() -> Self {
    Self::with_hashes(Default::default())
  }

  pub fn with_hashes(hashes: Arc<RwLock<Vec<Digest>>>) -> Self {
    Self { hashes }
  }
}

impl Default for MemStorage {
  fn default() -> Self {
    Self::new()
  }
}

impl Clone for MemStorage {
  fn clone(&self) -> Self {
    Self { hashes: self.hashes.clone() }
  }
}

impl Storage for MemStorage {
  fn append(&mut self, hash: &Digest) -> Result<Index> {
    let mut hashes = self.hashes.write()?;
    hashes.push(*hash);
    Ok(hashes.len() as Index - 1)
  }

  fn get(&self, index: Index) -> Result<Option<Digest>> {
    Ok(self.hashes.read()?.get(index as usize).copied())
  }

  fn len(&self) -> Result<u64> {
    Ok(self.hashes.read()?.len() as u64)
  }
}
