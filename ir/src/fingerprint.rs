// fingerprint.rs — Content hash of a graph
//
// SHA-256 of the compact JSON encoding. Two graphs with the same
// fingerprint encode identically: same names, node order, attributes,
// initializers and outputs. Arena ids do not take part, so a graph and its
// decode-encode round trip share a fingerprint.

use sha2::{Digest, Sha256};

use crate::codec;
use crate::graph::Graph;

pub fn fingerprint(graph: &Graph) -> [u8; 32] {
    let canonical = serde_json::to_vec(&codec::encode_graph(graph))
        .expect("wire structs always serialize");
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Hex string of the fingerprint (64 characters).
pub fn fingerprint_hex(graph: &Graph) -> String {
    bytes_to_hex(&fingerprint(graph))
}

fn bytes_to_hex(bytes: &[u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}
