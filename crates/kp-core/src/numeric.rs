//! Sample type and reduced-precision helpers.

/// Floating point type used for every metric sample.
pub type Sample = f64;

/// Largest finite IEEE binary16 value.
pub const HALF_MAX: Sample = 65504.0;

/// Round a sample to the nearest IEEE binary16 value (ties to even).
///
/// Tabular sources are stored at half precision. Values beyond the half range
/// become infinite, values below the smallest subnormal flush to a signed zero.
pub fn round_to_half(v: Sample) -> Sample {
    if !v.is_finite() || v == 0.0 {
        return v;
    }
    let mag = v.abs();
    // unbiased exponent of the leading bit, clamped to the smallest normal half exponent
    let biased = ((mag.to_bits() >> 52) & 0x7ff) as i32;
    let exp = (biased - 1023).max(-14);
    let ulp = 2f64.powi(exp - 10);
    let rounded = (mag / ulp).round_ties_even() * ulp;
    let out = if rounded > HALF_MAX {
        Sample::INFINITY
    } else {
        rounded
    };
    out.copysign(v)
}
