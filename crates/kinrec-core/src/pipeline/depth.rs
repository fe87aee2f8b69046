use std::panic::Location;

use error_location::ErrorLocation;

use crate::{CaptureError, CoreResult};

/// Convert raw depth samples into a grayscale BGRA display/storage buffer.
///
/// Samples inside `[min_reliable, max_reliable]` (inclusive) keep their low
/// 8 bits as intensity; the most-significant bits are discarded, so detail is
/// preserved and intensity wraps across the range. Samples outside the
/// reliable range map to 0 (black). Intensity is written to the B, G and R
/// bytes of each pixel; the fourth byte is left zero.
///
/// `out` must be exactly `4 * samples.len()` bytes.
///
/// # Errors
///
/// Returns [`CaptureError::BufferMismatch`] when `out` has the wrong length.
#[track_caller]
pub fn quantize_depth(
    samples: &[u16],
    min_reliable: u16,
    max_reliable: u16,
    out: &mut [u8],
) -> CoreResult<()> {
    let expected = samples.len() * 4;
    if out.len() != expected {
        return Err(CaptureError::BufferMismatch {
            expected,
            actual: out.len(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    for (sample, pixel) in samples.iter().zip(out.chunks_exact_mut(4)) {
        let intensity = if (min_reliable..=max_reliable).contains(sample) {
            (sample & 0xFF) as u8
        } else {
            0
        };
        pixel[0] = intensity;
        pixel[1] = intensity;
        pixel[2] = intensity;
        pixel[3] = 0;
    }

    Ok(())
}
