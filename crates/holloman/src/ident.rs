//! Identifier rendering: order letter, content-type hash, voxel hex.

use raster::Voxel;
use xxhash_rust::xxh32::xxh32;

/// Order-to-letter table. Orders 0 and 1 render as a space; `l` is skipped to
/// avoid confusion with `1`.
pub const ORDER_ALPHABET: &[u8; 25] = b"  cdefghijkmnopqrstuvwxyz";

/// Width of the padded content-type template.
const MAGIC_PAD: usize = 60;

/// Left-justified, space-padded, hard-truncated to 60 bytes. Identifier
/// stability across implementations depends on this exact byte shape.
pub fn pad_magic(magic: &str) -> [u8; MAGIC_PAD] {
    let mut out = [b' '; MAGIC_PAD];
    let bytes = magic.as_bytes();
    let n = bytes.len().min(MAGIC_PAD);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// 32-bit content-type hash: xxh32 over the padded label, seed 0.
pub fn magic_hash(magic: &str) -> u32 {
    xxh32(&pad_magic(magic), 0)
}

/// Letter for a projection order. Callers keep orders within the table;
/// loaded curves never exceed order 16.
pub fn order_letter(order: u32) -> char {
    ORDER_ALPHABET[order as usize] as char
}

/// Generic identifier: one letter, 8 hex characters of the content-type
/// hash, a dot, 32 hex characters of voxel.
pub fn generic_id(order: u32, magic: &str, voxel: &Voxel) -> String {
    format!("{}{:08x}.{}", order_letter(order), magic_hash(magic), voxel.hex())
}

/// DNA identifier: one letter, a dot, 32 hex characters of voxel.
pub fn dna_id(order: u32, voxel: &Voxel) -> String {
    format!("{}.{}", order_letter(order), voxel.hex())
}
