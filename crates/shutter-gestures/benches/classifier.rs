use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shutter_gestures::{
    GestureClassifier, GestureConfig, GridConfig, GridGeometry, Point, PointerSample,
    RangeSelectController, Size,
};
use shutter_testing::{double_tap, drag, pinch, StreamBuilder};

const CONTAINER: Size = Size::new(1080.0, 1920.0);
const PAN_STEP_SAMPLES: &[usize] = &[16, 64, 256];

fn classifier() -> GestureClassifier {
    GestureClassifier::new(GestureConfig::default(), CONTAINER).expect("valid default config")
}

/// A full viewer interaction: pinch in, pan around, release, dismiss.
fn viewer_session() -> Vec<PointerSample> {
    let mut samples = pinch(CONTAINER.center(), 300.0, 3.0, 12);
    let pan_start = 10_000;
    samples.extend(
        StreamBuilder::new()
            .at(pan_start)
            .down(1, CONTAINER.center())
            .move_by(1, Point::new(120.0, 0.0))
            .move_by(1, Point::new(120.0, 40.0))
            .move_by(1, Point::new(-200.0, -40.0))
            .up(1)
            .build(),
    );
    samples
}

struct BenchGrid;

impl GridGeometry for BenchGrid {
    fn item_at(&self, position: Point) -> Option<usize> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let col = (position.x / 120.0) as usize;
        let row = (position.y / 120.0) as usize;
        let index = row * 9 + col;
        (col < 9 && index < 10_000).then_some(index)
    }

    fn item_count(&self) -> usize {
        10_000
    }

    fn viewport_height(&self) -> f32 {
        1920.0
    }
}

fn bench_viewer_session(c: &mut Criterion) {
    let samples = viewer_session();
    c.bench_function("viewer_session", |b| {
        b.iter(|| {
            let mut classifier = classifier();
            for sample in &samples {
                black_box(classifier.process(sample));
            }
            black_box(classifier.transform());
        });
    });
}

fn bench_pan_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("pan_stream");
    for &steps in PAN_STEP_SAMPLES {
        let zoom = double_tap(CONTAINER.center(), 100);
        let pan = drag(
            CONTAINER.center(),
            CONTAINER.center() + Point::new(400.0, 0.0),
            steps,
        );
        group.bench_with_input(BenchmarkId::new("samples", steps), &steps, |b, _| {
            b.iter(|| {
                let mut classifier = classifier();
                for sample in zoom.iter().chain(&pan) {
                    black_box(classifier.process(sample));
                }
            });
        });
    }
    group.finish();
}

fn bench_dismiss_stream(c: &mut Criterion) {
    let samples = drag(
        CONTAINER.center(),
        CONTAINER.center() + Point::new(0.0, 500.0),
        24,
    );
    c.bench_function("dismiss_stream", |b| {
        b.iter(|| {
            let mut classifier = classifier();
            for sample in &samples {
                black_box(classifier.process(sample));
            }
        });
    });
}

fn bench_range_select_sweep(c: &mut Criterion) {
    // Diagonal sweep across the grid, crossing a new cell most frames.
    let samples = drag(Point::new(60.0, 60.0), Point::new(1000.0, 1800.0), 64);
    let grid = BenchGrid;
    c.bench_function("range_select_sweep", |b| {
        b.iter(|| {
            let mut controller =
                RangeSelectController::new(GridConfig::default()).expect("valid default config");
            for sample in &samples {
                black_box(controller.process(sample, &grid));
            }
            black_box(controller.selection().len());
        });
    });
}

criterion_group!(
    gestures,
    bench_viewer_session,
    bench_pan_stream,
    bench_dismiss_stream,
    bench_range_select_sweep
);
criterion_main!(gestures);
