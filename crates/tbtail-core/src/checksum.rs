//! CRC-32C checksums as used by the TFRecord framing
//!
//! Every frame carries two masked checksums: one over the 8-byte length
//! header and one over the payload. The mask is a fixed rotate-and-add
//! applied to the raw Castagnoli CRC; it is only ever computed forward and
//! compared against the stored value.

/// Reflected form of the Castagnoli polynomial 0x1EDC6F41
const POLY_REFLECTED: u32 = 0x82F6_3B78;

/// Constant added after rotation when masking
const MASK_DELTA: u32 = 0xa282_ead8;

/// Byte-at-a-time lookup table, built at compile time
static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC-32C of `bytes` using the lookup table
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        let index = ((crc ^ byte as u32) & 0xff) as usize;
        crc = TABLE[index] ^ (crc >> 8);
    }
    !crc
}

/// Compute the CRC-32C of `bytes` one bit at a time
///
/// Slow reference implementation; must agree with [`checksum`] for every input.
pub fn checksum_bitwise(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLY_REFLECTED
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// Apply the TFRecord mask to a raw checksum
pub fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Masked CRC-32C of `bytes`, the value stored in the file
pub fn masked_checksum(bytes: &[u8]) -> u32 {
    mask(checksum(bytes))
}

/// Check `bytes` against a stored little-endian masked checksum
///
/// Returns false when `expected` is not exactly 4 bytes long.
pub fn verify(bytes: &[u8], expected: &[u8]) -> bool {
    match <[u8; 4]>::try_from(expected) {
        Ok(raw) => u32::from_le_bytes(raw) == masked_checksum(bytes),
        Err(_) => false,
    }
}
