use crate::{CaptureError, quantize_depth};

/// WHAT: Reliable-range samples keep their value as grayscale intensity
/// WHY: The display and the stored frames must show real depth detail
#[test]
fn given_in_range_samples_when_quantizing_then_intensity_matches_sample() {
    // Given: Samples inside [50, 200], including both boundaries
    let samples: [u16; 4] = [50, 120, 199, 200];
    let mut out = vec![0xAAu8; samples.len() * 4];

    // When: Quantizing with min=50, max=200
    quantize_depth(&samples, 50, 200, &mut out).unwrap();

    // Then: B, G and R carry the sample value, the fourth byte stays zero
    for (sample, pixel) in samples.iter().zip(out.chunks_exact(4)) {
        let expected = *sample as u8;
        assert_eq!(pixel, [expected, expected, expected, 0]);
    }
}

/// WHAT: Out-of-range samples map to the black sentinel
/// WHY: Unreliable distances must never be left undefined
#[test]
fn given_out_of_range_samples_when_quantizing_then_intensity_is_zero() {
    // Given: Samples just outside the reliable range on both sides
    let samples: [u16; 3] = [49, 201, 0];
    let mut out = vec![0xAAu8; samples.len() * 4];

    // When: Quantizing with min=50, max=200
    quantize_depth(&samples, 50, 200, &mut out).unwrap();

    // Then: Every channel is zero
    assert!(out.iter().all(|&byte| byte == 0));
}

/// WHAT: Samples above 255 wrap into the low byte
/// WHY: Discarding the most-significant bits preserves local detail
#[test]
fn given_sample_above_255_when_quantizing_then_intensity_wraps() {
    // Given: A reliable sample of 500mm
    let samples: [u16; 1] = [500];
    let mut out = vec![0u8; 4];

    // When: Quantizing with a range that includes it
    quantize_depth(&samples, 400, 4500, &mut out).unwrap();

    // Then: Intensity is 500 & 0xFF == 244
    assert_eq!(out, [244, 244, 244, 0]);
}

/// WHAT: A wrong-sized output buffer is rejected
/// WHY: Silent truncation would corrupt the display buffer
#[test]
fn given_wrong_output_length_when_quantizing_then_buffer_mismatch_error() {
    // Given: Two samples but only one pixel of output
    let samples: [u16; 2] = [100, 100];
    let mut out = vec![0u8; 4];

    // When: Quantizing
    let result = quantize_depth(&samples, 50, 200, &mut out);

    // Then: BufferMismatch reports both lengths
    assert!(matches!(
        result,
        Err(CaptureError::BufferMismatch {
            expected: 8,
            actual: 4,
            ..
        })
    ));
}
