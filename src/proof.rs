use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{DIGEST_LEN, Digest, Error, Index, Result};

/// Which operand the sibling takes when the pair is hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
  Left,
  Right,
}

impl Side {
  fn marker(self) -> u8 {
    match self {
      Side::Left => 0,
      Side::Right => 1,
    }
  }

  fn from_marker(marker: u8) -> Result<Self> {
    match marker {
      0 => Ok(Side::Left),
      1 => Ok(Side::Right),
      _ => Err(Error::InvalidProofStructure(format!("unknown side marker {marker:#04x}"))),
    }
  }
}

/// One level of an audit path: the sibling digest and the side it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
  pub side: Side,
  pub sibling: Digest,
}

/// Sibling-hash path from a leaf to the root, plus the leaf index and the tree size at
/// the moment of generation. Immutable once created; verification must use a commitment
/// taken at exactly `tree_size` leaves.
///
/// Wire encoding, little-endian:
/// `[leaf_index: u64][tree_size: u64][count: u32]` followed by `count` entries of
/// `[side: 1 byte][sibling: 32 bytes]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditProof {
  leaf_index: Index,
  tree_size: u64,
  path: Vec<ProofStep>,
}

impl AuditProof {
  pub fn new(leaf_index: Index, tree_size: u64, path: Vec<ProofStep>) -> Self {
    AuditProof { leaf_index, tree_size, path }
  }

  pub fn leaf_index(&self) -> Index {
    self.leaf_index
  }

  pub fn tree_size(&self) -> u64 {
    self.tree_size
  }

  pub fn path(&self) -> &[ProofStep] {
    &self.path
  }

  /// Serialized size in bytes.
  pub fn encoded_len(&self) -> usize {
    8 + 8 + 4 + self.path.len() * (1 + DIGEST_LEN)
  }

  pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize> {
    w.write_u64::<LittleEndian>(self.leaf_index)?;
    w.write_u64::<LittleEndian>(self.tree_size)?;
    w.write_u32::<LittleEndian>(self.path.len() as u32)?;
    for step in &self.path {
      w.write_u8(step.side.marker())?;
      w.write_all(&step.sibling)?;
    }
    Ok(self.encoded_len())
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(self.encoded_len());
    self.write_to(&mut buffer)?;
    Ok(buffer)
  }

  /// Decode a proof, rejecting malformed input with [`Error::InvalidProofStructure`]:
  /// truncation, an unknown side marker, trailing bytes, a leaf index at or past the
  /// recorded tree size, or a path longer than any tree of that size can produce.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let mut r = Cursor::new(bytes);
    let leaf_index = r.read_u64::<LittleEndian>().map_err(truncated)?;
    let tree_size = r.read_u64::<LittleEndian>().map_err(truncated)?;
    let count = r.read_u32::<LittleEndian>().map_err(truncated)?;
    if tree_size == 0 {
      return Err(Error::InvalidProofStructure("tree size is zero".to_string()));
    }
    if leaf_index >= tree_size {
      return Err(Error::InvalidProofStructure(format!(
        "leaf index {leaf_index} not below tree size {tree_size}"
      )));
    }
    if count as u64 > max_path_len(tree_size) {
      return Err(Error::InvalidProofStructure(format!(
        "path of {count} siblings exceeds the depth of a tree with {tree_size} leaves"
      )));
    }
    let mut path = Vec::with_capacity(count as usize);
    for _ in 0..count {
      let side = Side::from_marker(r.read_u8().map_err(truncated)?)?;
      let mut sibling = [0u8; DIGEST_LEN];
      r.read_exact(&mut sibling).map_err(truncated)?;
      path.push(ProofStep { side, sibling });
    }
    if r.position() as usize != bytes.len() {
      return Err(Error::InvalidProofStructure("trailing bytes after proof".to_string()));
    }
    Ok(AuditProof { leaf_index, tree_size, path })
  }
}

fn truncated(_: std::io::Error) -> Error {
  Error::InvalidProofStructure("truncated proof encoding".to_string())
}

/// ceil(log2(n)): the longest possible audit path for a tree of `n` leaves.
pub(crate) fn max_path_len(n: u64) -> u64 {
  if n <= 1 { 0 } else { u64::from(u64::BITS - (n - 1).leading_zeros()) }
}
