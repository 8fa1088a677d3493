//! End-to-end scenarios on small hand-checked images.

mod common;

use common::{channel, gray, init_logging, uniform};
use imagerie::prelude::*;

#[test]
fn test_erosion_of_centered_block() {
    init_logging();
    let mut buffer = gray(&[
        &[0.0, 0.0, 0.0, 0.0, 0.0],
        &[0.0, 255.0, 255.0, 255.0, 0.0],
        &[0.0, 255.0, 255.0, 255.0, 0.0],
        &[0.0, 255.0, 255.0, 255.0, 0.0],
        &[0.0, 0.0, 0.0, 0.0, 0.0],
    ]);
    Erosion::with_element(StructuringElement::square(1).unwrap())
        .apply(&mut buffer)
        .unwrap();

    for y in 0..5 {
        for x in 0..5 {
            let expected = if (y, x) == (2, 2) { 255.0 } else { 0.0 };
            assert_eq!(buffer.sample(y, x, 0).unwrap(), expected);
        }
    }
}

#[test]
fn test_quantize_four_levels_of_uniform_image() {
    init_logging();
    let mut image = Image::from_buffer(uniform(6, 4, 3, 100.0));
    image.quantize(4).unwrap();
    assert!(image.current().as_slice().iter().all(|&v| v == 96.0));
}

#[test]
fn test_equalize_two_level_image() {
    init_logging();
    let mut bytes = vec![50u8; 4 * 4 * 3];
    bytes[24..].fill(200);
    let mut image = Image::load_from_buffer(&bytes, 4, 4).unwrap();
    image.equalize_histogram();

    let samples = image.current().as_slice();
    assert!(samples[..24].iter().all(|&v| v == 0.0));
    assert!(samples[24..].iter().all(|&v| v == 255.0));
}

#[test]
fn test_disk_discretisation() {
    let cross = StructuringElement::disk(1.0).unwrap();
    assert_eq!(cross.len(), 5);
    for offset in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
        assert!(cross.contains(offset.0, offset.1));
    }
    assert!(!cross.contains(1, 1));

    let disk = StructuringElement::disk(2f64.sqrt()).unwrap();
    assert_eq!(disk.len(), 9);
    assert!(disk.contains(-1, 1));
    assert!(!disk.contains(2, 0));
}

#[test]
fn test_gaussian_kernel_is_normalised() {
    for (size, sigma) in [(1, 0.5), (3, 1.0), (5, 1.4), (9, 3.0)] {
        let filter = GaussianFilter::new(size, sigma).unwrap();
        let sum: f64 = filter.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "size {} sigma {}", size, sigma);
    }
}

#[test]
fn test_mean_keeps_constant_border() {
    let mut buffer = uniform(5, 5, 1, 90.0);
    MeanFilter::new(3).unwrap().apply(&mut buffer).unwrap();
    assert!((buffer.sample(2, 2, 0).unwrap() - 90.0).abs() < 1e-9);
    // corner averages 4 taps, edge 6
    assert!((buffer.sample(0, 0, 0).unwrap() - 90.0).abs() < 1e-9);
    assert!((buffer.sample(0, 2, 0).unwrap() - 90.0).abs() < 1e-9);
}

#[test]
fn test_median_removes_salt_noise() {
    let mut buffer = uniform(5, 5, 1, 40.0);
    buffer.set_sample(2, 2, 0, 255.0).unwrap();
    buffer.set_sample(0, 4, 0, 255.0).unwrap();
    MedianFilter::new(3).unwrap().apply(&mut buffer).unwrap();
    assert!(buffer.as_slice().iter().all(|&v| v == 40.0));
}

#[test]
fn test_median_uses_actual_border_count() {
    // corner window holds [10, 20, 30, 40]; index 2 of the sorted list is 30
    let mut buffer = gray(&[&[10.0, 20.0, 0.0], &[30.0, 40.0, 0.0], &[0.0, 0.0, 0.0]]);
    MedianFilter::new(3).unwrap().apply(&mut buffer).unwrap();
    assert_eq!(buffer.sample(0, 0, 0).unwrap(), 30.0);
}

#[test]
fn test_min_and_max_filters() {
    let source = gray(&[&[10.0, 20.0, 30.0], &[40.0, 50.0, 60.0], &[70.0, 80.0, 90.0]]);

    let mut min = source.clone();
    MinFilter::new(3).unwrap().apply(&mut min).unwrap();
    assert_eq!(min.sample(1, 1, 0).unwrap(), 10.0);
    assert_eq!(min.sample(2, 2, 0).unwrap(), 50.0);

    let mut max = source;
    MaxFilter::new(3).unwrap().apply(&mut max).unwrap();
    assert_eq!(max.sample(0, 0, 0).unwrap(), 50.0);
    assert_eq!(max.sample(1, 1, 0).unwrap(), 90.0);
}

#[test]
fn test_bilateral_keeps_flat_regions() {
    let mut buffer = uniform(6, 6, 3, 123.0);
    BilateralFilter::default().apply(&mut buffer).unwrap();
    assert!(buffer.as_slice().iter().all(|&v| (v - 123.0).abs() < 1e-9));
}

#[test]
fn test_sobel_and_prewitt_zero_on_flat_image() {
    for filter in [&SobelFilter as &dyn Filter, &PrewittFilter] {
        let mut buffer = uniform(7, 7, 3, 180.0);
        filter.apply(&mut buffer).unwrap();
        assert!(buffer.as_slice().iter().all(|&v| v == 0.0), "{}", filter.name());
    }
}

#[test]
fn test_canny_finds_vertical_step() {
    init_logging();
    let mut buffer = PixelBuffer::new(12, 10, 3).unwrap();
    for y in 0..10 {
        for x in 6..12 {
            for c in 0..3 {
                buffer.set_sample(y, x, c, 255.0).unwrap();
            }
        }
    }
    CannyFilter::default().apply(&mut buffer).unwrap();

    assert!(buffer.as_slice().iter().all(|&v| v == 0.0 || v == 255.0));
    let red = channel(&buffer, 0);
    assert_eq!(red, channel(&buffer, 2));

    let row = &red[5 * 12..6 * 12];
    assert!(row[5] == 255.0 || row[6] == 255.0);
    assert!(row[..4].iter().all(|&v| v == 0.0));
}

#[test]
fn test_canny_rejects_bad_thresholds() {
    for (low, high) in [(100.0, 100.0), (120.0, 80.0), (-1.0, 50.0), (10.0, 300.0)] {
        assert!(matches!(
            CannyFilter::new(low, high),
            Err(ImagingError::InvalidThreshold { .. })
        ));
    }
}

#[test]
fn test_even_kernel_sizes_are_rejected() {
    assert_eq!(MeanFilter::new(4).unwrap_err(), ImagingError::InvalidKernelSize(4));
    assert_eq!(MedianFilter::new(0).unwrap_err(), ImagingError::InvalidKernelSize(0));
    assert!(GaussianFilter::new(-3, 1.0).is_err());
    assert!(Opening::new(2).is_err());
}

#[test]
fn test_gaussian_rejects_non_positive_sigma() {
    let err = GaussianFilter::new(5, 0.0).unwrap_err();
    assert!(matches!(err, ImagingError::InvalidParameter { .. }));
    assert!(BilateralFilter::new(5, 10.0, -1.0).is_err());
}

#[test]
fn test_buffer_access_errors() {
    let mut buffer = PixelBuffer::new(3, 2, 1).unwrap();
    assert!(matches!(
        buffer.sample(2, 0, 0),
        Err(ImagingError::OutOfRange { .. })
    ));
    assert!(buffer.set_sample(0, 3, 0, 1.0).is_err());
    assert!(matches!(
        buffer.reduce_to_single_channel(),
        Err(ImagingError::PreconditionViolated(_))
    ));
}

#[test]
fn test_negate_then_restore() {
    let bytes: Vec<u8> = (0..27).map(|i| i * 9).collect();
    let mut image = Image::load_from_buffer(&bytes, 3, 3).unwrap();
    image.negate();
    assert_eq!(image.current().sample(0, 0, 1).unwrap(), 246.0);
    image.restore_original();
    assert_eq!(image.current().to_bytes(), bytes);
}

#[test]
fn test_grayscale_then_binarize() {
    let mut image = Image::load_from_buffer(&[200, 200, 200, 20, 20, 20], 2, 1).unwrap();
    image.to_grayscale(GrayscaleMethod::Rec601).unwrap();
    assert_eq!(image.channels(), 1);
    image.binarize(127.0);
    assert_eq!(image.current().as_slice(), &[255.0, 0.0]);
}
