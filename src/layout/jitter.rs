const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-16 code units of `key`.
///
/// Hashing code units rather than bytes keeps the values identical to the
/// ones the wall has always produced for non-ASCII ids.
pub fn fnv1a(key: &str) -> u32 {
    let mut h = FNV_OFFSET;
    for unit in key.encode_utf16() {
        h ^= u32::from(unit);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Map `key` to a stable value in `[min, max]`.
pub fn seeded_float(key: &str, min: f64, max: f64) -> f64 {
    let t = f64::from(fnv1a(key)) / f64::from(u32::MAX);
    min + (max - min) * t
}

/// Offset in `[-spread, spread]` for one axis of one track.
pub(super) fn jitter(id: &str, salt: &str, spread: f64) -> f64 {
    seeded_float(&format!("{id}{salt}"), -spread, spread)
}
