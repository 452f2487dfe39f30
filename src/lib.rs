//! Append-only Merkle tree over an external leaf-hash storage, producing compact audit
//! proofs that a record is included in the log. A proof is verified against a single
//! root commitment without access to any other leaf.
//!
//! The prover side owns a [`MerkleTree`]; the auditor side holds only a proof, the leaf
//! digest in question, and a commitment, and checks them with [`verify`].

use std::sync::PoisonError;

use thiserror::Error;

pub mod hash;
pub mod hashtree;
pub mod proof;
pub mod storage;
pub mod verify;

pub use hash::{Blake3Engine, HashEngine};
pub use hashtree::MerkleTree;
pub use proof::{AuditProof, ProofStep, Side};
pub use storage::{MemStorage, Storage};
pub use verify::{verify, verify_bytes};

/// Number of bytes in a digest.
pub const DIGEST_LEN: usize = blake3::OUT_LEN;

/// Fixed-length hash value. Equality is byte-wise.
pub type Digest = [u8; DIGEST_LEN];

/// Leaf index within the tree, assigned in append order starting at 0.
pub type Index = u64;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested leaf index does not exist at the current tree size.
  #[error("leaf index {index} out of range for tree of size {size}")]
  IndexOutOfRange { index: Index, size: u64 },

  /// No leaf with the requested digest has been appended.
  #[error("digest has no corresponding leaf in the tree")]
  DigestNotFound,

  /// A serialized proof could not be decoded.
  #[error("invalid proof structure: {0}")]
  InvalidProofStructure(String),

  /// A commitment or proof was requested from a tree with no leaves.
  #[error("tree has no leaves")]
  EmptyTree,

  /// The storage backend failed or returned inconsistent data.
  #[error("storage failure: {0}")]
  Storage(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl<T> From<PoisonError<T>> for Error {
  fn from(err: PoisonError<T>) -> Self {
    Error::Storage(err.to_string())
  }
}

pub type Result<T> = std::result::Result<T, Error>;
