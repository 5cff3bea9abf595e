use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_reader::LuminanceSource;
use qr_reader::utils::binarization::{Binarizer, BinarizerKind};

/// Light/dark stripes over a horizontal brightness ramp
fn textured(width: usize, height: usize) -> LuminanceSource {
    let mut gray = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let base = (x * 160 / width) as u8 + 40;
            let dark = ((x / 7) + (y / 7)) % 2 == 0;
            gray.push(if dark { base / 3 } else { base.saturating_add(50) });
        }
    }
    LuminanceSource::from_gray(width, height, gray).expect("buffer matches dimensions")
}

fn bench_black_matrix(c: &mut Criterion, kind: BinarizerKind, width: usize, height: usize) {
    let source = textured(width, height);
    let name = format!("{:?}_black_matrix_{}x{}", kind, width, height).to_lowercase();
    c.bench_function(&name, |b| {
        b.iter(|| {
            let mut binarizer = Binarizer::new(kind, black_box(source.clone()));
            binarizer.black_matrix().map(|m| m.width()).unwrap_or(0)
        })
    });
}

fn bench_global_small(c: &mut Criterion) {
    bench_black_matrix(c, BinarizerKind::Global, 100, 100);
}

fn bench_global_medium(c: &mut Criterion) {
    bench_black_matrix(c, BinarizerKind::Global, 640, 480);
}

fn bench_hybrid_medium(c: &mut Criterion) {
    bench_black_matrix(c, BinarizerKind::Hybrid, 640, 480);
}

fn bench_hybrid_large(c: &mut Criterion) {
    bench_black_matrix(c, BinarizerKind::Hybrid, 1920, 1080);
}

fn bench_black_row(c: &mut Criterion) {
    let binarizer = Binarizer::new(BinarizerKind::Global, textured(640, 480));
    c.bench_function("global_black_row_640", |b| {
        b.iter(|| binarizer.black_row(black_box(240), None).map(|row| row.size()).unwrap_or(0))
    });
}

criterion_group!(
    benches,
    bench_global_small,
    bench_global_medium,
    bench_hybrid_medium,
    bench_hybrid_large,
    bench_black_row
);
criterion_main!(benches);
