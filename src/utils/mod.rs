//! The utilies module provides general capabilities that span the input
//! modeling and output analysis modules: the crate error type, stable name
//! hashing for stream seeding, and decimal rounding.

pub mod errors;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash of a stream name.  Unlike `DefaultHasher`, the output
/// is fixed across platforms and compiler releases, so a stream name maps to
/// the same seed forever.
pub fn stable_hash(name: &str) -> u64 {
    name.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Round to a fixed number of decimal places, returned as an integer count
/// of 10^-decimals units.  Used for exact table lookups on float keys.
pub fn round_to_units(value: f64, decimals: i32) -> i64 {
    (value * 10f64.powi(decimals)).round() as i64
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_known_values() {
        // Reference vectors for FNV-1a 64
        assert_eq!(stable_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash("a"), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(stable_hash("uniform-01"), stable_hash("uniform-02"));
    }

    #[test]
    fn rounds_to_ten_thousandths() {
        assert_eq!(round_to_units(1.0 - 0.05 / 2.0, 4), 9750);
        assert_eq!(round_to_units(1.0 - 0.01 / 2.0, 4), 9950);
        assert_eq!(round_to_units(0.93333, 4), 9333);
    }
}
