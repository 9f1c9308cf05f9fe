use byte_slice_cast::AsByteSlice;

/// The opaque `encode(n: uint) -> string` collaborator `NAME.RAND` draws
/// fresh deterministic names from. Treated by SPEC_FULL.md as an external
/// collaborator with no prescribed algorithm; this is a small, swappable
/// module rather than an unimplemented stub, matching the teacher's own
/// `execute_name.rs` (base64 of the counter, `"RND."`-prefixed).
pub fn encode(counter: u64) -> String {
    let bytes: [u64; 1] = [counter];
    let b64 = base64::encode(bytes.as_byte_slice());
    format!("RND.{}", b64)
}
