//! String folding hash

/// Fold a key into a slot index in `[0, capacity)`
///
/// Each 4-character window is read as a little-endian base-256 number and
/// summed. The sum is squared (wrapping) and shifted right by 8 before the
/// absolute value is reduced modulo `capacity`.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn sfold(key: &str, capacity: usize) -> usize {
    let mut sum: i64 = 0;

    for window in key.as_bytes().chunks(4) {
        let mut mul: i64 = 1;
        for &byte in window {
            sum = sum.wrapping_add(i64::from(byte).wrapping_mul(mul));
            mul = mul.wrapping_mul(256);
        }
    }

    let folded = sum.wrapping_mul(sum) >> 8;
    (folded.unsigned_abs() % capacity as u64) as usize
}
