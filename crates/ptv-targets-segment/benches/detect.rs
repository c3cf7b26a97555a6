use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ptv_targets_core::GrayImage;
use ptv_targets_segment::{DetectionConfig, TargetDetector};

/// Regular lattice of Gaussian particle images, `pitch` pixels apart.
fn particle_field(width: usize, height: usize, pitch: usize) -> GrayImage {
    let mut img = GrayImage::new(width, height);
    let sigma2 = 2.0 * 1.3f64 * 1.3;
    for y in 0..height {
        for x in 0..width {
            let cx = (x / pitch * pitch + pitch / 2) as f64 + 0.3;
            let cy = (y / pitch * pitch + pitch / 2) as f64 - 0.2;
            let r2 = (x as f64 - cx).powi(2) + (y as f64 - cy).powi(2);
            img.set(x, y, (220.0 * (-r2 / sigma2).exp()).round() as u8);
        }
    }
    img
}

fn bench_detect(c: &mut Criterion) {
    let detector = TargetDetector::new(DetectionConfig {
        threshold: 20,
        discontinuity: 200,
        ..DetectionConfig::default()
    })
    .expect("valid config");

    let mut group = c.benchmark_group("detect");
    for &(w, h) in &[(640usize, 480usize), (1280, 1024)] {
        let img = particle_field(w, h, 16);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &img, |b, img| {
            b.iter(|| detector.detect(black_box(&img.view())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
