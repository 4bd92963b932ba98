//! FNV-1a 64-bit. Picked for being fixed and dependency-free; it is not a
//! collision-resistant hash and must not be used as one.

const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

pub fn fnv1a64(input: &str) -> u64 {
    input.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
