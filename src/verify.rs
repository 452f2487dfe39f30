use crate::hash::HashEngine;
use crate::proof::{AuditProof, Side};
use crate::{Digest, Result};

/// Recompute a candidate root from `leaf_digest` and the proof's sibling path, and
/// compare it to `commitment`. A mismatch is `false`, never an error.
///
/// This needs only the proof, the claimed leaf digest, and a commitment taken when the
/// tree held exactly `proof.tree_size()` leaves; the verifier never sees the tree or
/// any other leaf.
pub fn verify<E: HashEngine>(engine: &E, proof: &AuditProof, leaf_digest: &Digest, commitment: &Digest) -> bool {
  let mut current = *leaf_digest;
  for step in proof.path() {
    current = match step.side {
      Side::Left => engine.hash_node(&step.sibling, &current),
      Side::Right => engine.hash_node(&current, &step.sibling),
    };
  }
  current == *commitment
}

/// Decode a serialized proof and verify it. Malformed encodings fail with
/// [`crate::Error::InvalidProofStructure`]; a well-formed proof that does not match the
/// commitment yields `Ok(false)`.
pub fn verify_bytes<E: HashEngine>(engine: &E, bytes: &[u8], leaf_digest: &Digest, commitment: &Digest) -> Result<bool> {
  let proof = AuditProof::from_bytes(bytes)?;
  Ok(verify(engine, &proof, leaf_digest, commitment))
}
