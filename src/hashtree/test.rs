use super::*;
use crate::verify::verify;

fn tree_of(n: u64) -> MerkleTree<MemStorage> {
  let mut tree = MerkleTree::in_memory();
  for i in 0..n {
    let index = tree.append(format!("record-{i}").as_bytes()).unwrap();
    assert_eq!(i, index);
  }
  tree
}

#[test]
fn append_increments_size_by_one() {
  let mut tree = MerkleTree::in_memory();
  assert_eq!(0, tree.size().unwrap());
  for i in 0..20u64 {
    tree.append(format!("record-{i}").as_bytes()).unwrap();
    assert_eq!(i + 1, tree.size().unwrap());
  }
}

#[test]
fn commitments_are_reproducible_at_every_size() {
  let mut commitments = Vec::new();
  let mut tree = MerkleTree::in_memory();
  for i in 0..16u64 {
    tree.append(format!("record-{i}").as_bytes()).unwrap();
    commitments.push(tree.commitment().unwrap());
  }
  // A fresh tree rebuilt to each historical size reproduces the commitment taken then.
  for (i, commitment) in commitments.iter().enumerate() {
    assert_eq!(*commitment, tree_of(i as u64 + 1).commitment().unwrap());
  }
}

#[test]
fn proofs_verify_for_every_leaf_at_every_size() {
  let engine = Blake3Engine;
  for n in 1..=32u64 {
    let tree = tree_of(n);
    let commitment = tree.commitment().unwrap();
    for i in 0..n {
      let proof = tree.audit_proof(i).unwrap();
      assert_eq!(n, proof.tree_size());
      assert_eq!(i, proof.leaf_index());
      assert!(proof.path().len() as u64 <= crate::proof::max_path_len(n), "n={n}, i={i}");
      let leaf = tree.leaf_digest(i).unwrap();
      assert!(verify(&engine, &proof, &leaf, &commitment), "n={n}, i={i}");
    }
  }
}

#[test]
fn single_leaf_commitment_is_the_leaf_hash() {
  let mut tree = MerkleTree::in_memory();
  tree.append(b"A").unwrap();
  assert_eq!(Blake3Engine.hash_leaf(b"A"), tree.commitment().unwrap());
}

#[test]
fn trailing_leaf_promotes_without_rehashing() {
  let engine = Blake3Engine;
  let mut tree = MerkleTree::in_memory();
  tree.append(b"A").unwrap();
  tree.append(b"B").unwrap();
  tree.append(b"C").unwrap();
  let ab = engine.hash_node(&engine.hash_leaf(b"A"), &engine.hash_leaf(b"B"));
  assert_eq!(engine.hash_node(&ab, &engine.hash_leaf(b"C")), tree.commitment().unwrap());
}

#[test]
fn identical_record_lists_yield_identical_commitments() {
  assert_eq!(tree_of(13).commitment().unwrap(), tree_of(13).commitment().unwrap());
}

#[test]
fn duplicate_records_resolve_to_the_first_index() {
  let mut tree = MerkleTree::in_memory();
  tree.append(b"same").unwrap();
  tree.append(b"other").unwrap();
  tree.append(b"same").unwrap();
  let digest = Blake3Engine.hash_leaf(b"same");
  assert_eq!(0, tree.audit_proof_for_digest(&digest).unwrap().leaf_index());
}

#[test]
fn append_leaf_matches_append() {
  let mut by_record = MerkleTree::in_memory();
  let mut by_digest = MerkleTree::in_memory();
  for i in 0..7u64 {
    let record = format!("record-{i}");
    by_record.append(record.as_bytes()).unwrap();
    by_digest.append_leaf(Blake3Engine.hash_leaf(record.as_bytes())).unwrap();
  }
  assert_eq!(by_record.commitment().unwrap(), by_digest.commitment().unwrap());
}

#[test]
fn contains_tracks_appended_digests() {
  let mut tree = MerkleTree::in_memory();
  let digest = Blake3Engine.hash_leaf(b"present");
  assert!(!tree.contains(&digest));
  tree.append(b"present").unwrap();
  assert!(tree.contains(&digest));
  assert!(!tree.contains(&Blake3Engine.hash_leaf(b"absent")));
}

#[test]
fn historical_proof_verifies_against_its_own_commitment() {
  let engine = Blake3Engine;
  let mut tree = tree_of(4);
  let commitment_4 = tree.commitment().unwrap();
  let proof = tree.audit_proof(0).unwrap();
  let leaf = tree.leaf_digest(0).unwrap();

  tree.append(b"later").unwrap();
  let commitment_5 = tree.commitment().unwrap();
  assert_ne!(commitment_4, commitment_5);

  // The returned proof is an owned snapshot; further appends do not touch it.
  assert_eq!(4, proof.tree_size());
  assert!(verify(&engine, &proof, &leaf, &commitment_4));
  assert!(!verify(&engine, &proof, &leaf, &commitment_5));
  assert!(verify(&engine, &tree.audit_proof(0).unwrap(), &leaf, &commitment_5));
}

#[test]
fn rebuilds_from_existing_storage() {
  let storage = MemStorage::new();
  let mut tree = MerkleTree::new(storage.clone(), Blake3Engine).unwrap();
  for i in 0..9u64 {
    tree.append(format!("record-{i}").as_bytes()).unwrap();
  }
  let restored = MerkleTree::new(storage, Blake3Engine).unwrap();
  assert_eq!(tree.size().unwrap(), restored.size().unwrap());
  assert_eq!(tree.commitment().unwrap(), restored.commitment().unwrap());
  assert_eq!(tree.audit_proof(3).unwrap(), restored.audit_proof(3).unwrap());
}

#[test]
fn empty_tree_has_no_commitment_or_proof() {
  let tree = MerkleTree::in_memory();
  assert!(matches!(tree.commitment(), Err(Error::EmptyTree)));
  assert!(matches!(tree.audit_proof(0), Err(Error::EmptyTree)));
}

#[test]
fn out_of_range_index_is_rejected() {
  let tree = tree_of(3);
  match tree.audit_proof(3) {
    Err(Error::IndexOutOfRange { index, size }) => {
      assert_eq!(3, index);
      assert_eq!(3, size);
    }
    other => panic!("expected IndexOutOfRange, got {other:?}"),
  }
  assert!(matches!(tree.leaf_digest(99), Err(Error::IndexOutOfRange { .. })));
}

#[test]
fn unknown_digest_is_rejected() {
  let tree = tree_of(4);
  let absent = Blake3Engine.hash_leaf(b"never appended");
  assert!(matches!(tree.audit_proof_for_digest(&absent), Err(Error::DigestNotFound)));
}
