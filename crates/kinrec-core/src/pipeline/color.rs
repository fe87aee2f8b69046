use std::panic::Location;

use error_location::ErrorLocation;

use crate::{
    CaptureError, CoreResult,
    sensor::{ColorFrameView, PixelFormat},
};

/// Convert a raw color frame into the fixed BGRA display/storage layout.
///
/// BGRA input is copied verbatim; YUY2 input is expanded with BT.601 integer
/// math. `out` must be exactly `4 * pixel_count` bytes.
#[track_caller]
pub(crate) fn convert_to_bgra(frame: &ColorFrameView<'_>, out: &mut [u8]) -> CoreResult<()> {
    let expected = frame.description.pixel_count() * 4;
    if out.len() != expected {
        return Err(CaptureError::BufferMismatch {
            expected,
            actual: out.len(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    match frame.format {
        PixelFormat::Bgra => {
            if frame.data.len() != expected {
                return Err(CaptureError::BufferMismatch {
                    expected,
                    actual: frame.data.len(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            out.copy_from_slice(frame.data);
        }
        PixelFormat::Yuy2 => {
            // YUY2 packs two pixels into 4 bytes: Y0 U Y1 V.
            let expected_raw = frame.description.pixel_count() * 2;
            if frame.data.len() != expected_raw {
                return Err(CaptureError::BufferMismatch {
                    expected: expected_raw,
                    actual: frame.data.len(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            for (src, dst) in frame.data.chunks_exact(4).zip(out.chunks_exact_mut(8)) {
                let (y0, u, y1, v) = (src[0], src[1], src[2], src[3]);
                write_bgra(&mut dst[0..4], y0, u, v);
                write_bgra(&mut dst[4..8], y1, u, v);
            }
        }
    }

    Ok(())
}

// BT.601 limited-range YUV -> full-range BGR.
fn write_bgra(dst: &mut [u8], y: u8, u: u8, v: u8) {
    let c = i32::from(y) - 16;
    let d = i32::from(u) - 128;
    let e = i32::from(v) - 128;

    let clamp = |value: i32| value.clamp(0, 255) as u8;

    dst[0] = clamp((298 * c + 516 * d + 128) >> 8);
    dst[1] = clamp((298 * c - 100 * d - 208 * e + 128) >> 8);
    dst[2] = clamp((298 * c + 409 * e + 128) >> 8);
    dst[3] = 0;
}
