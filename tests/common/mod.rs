//! Shared helpers for integration tests.

#![allow(dead_code)]

use imagerie::prelude::*;

/// Route `log` output through the test harness, honouring `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Single-channel buffer from rows of values.
pub fn gray(rows: &[&[f64]]) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(rows[0].len(), rows.len(), 1).unwrap();
    for (y, row) in rows.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            buffer.set_sample(y, x, 0, v).unwrap();
        }
    }
    buffer
}

/// Buffer with every sample set to `value`.
pub fn uniform(width: usize, height: usize, channels: usize, value: f64) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height, channels).unwrap();
    buffer.fill(value);
    buffer
}

/// Buffer filled from interleaved samples in layout order.
pub fn from_samples(width: usize, height: usize, channels: usize, samples: &[u8]) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height, channels).unwrap();
    for (i, &v) in samples.iter().enumerate() {
        let c = i % channels;
        let pixel = i / channels;
        buffer
            .set_sample(pixel / width, pixel % width, c, f64::from(v))
            .unwrap();
    }
    buffer
}

/// Every sample of channel `c`, row-major.
pub fn channel(buffer: &PixelBuffer, c: usize) -> Vec<f64> {
    buffer
        .as_slice()
        .iter()
        .skip(c)
        .step_by(buffer.channels())
        .copied()
        .collect()
}
