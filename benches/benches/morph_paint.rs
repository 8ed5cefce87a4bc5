// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for morph compositing: repainting damage and scrolling large contents.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use peniko::Color;
use understory_morph::{MorphDesc, NodeId, RecordingCanvas, Tree, ViewportOptions};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn next_f64(&mut self, upper: f64) -> f64 {
        f64::from(self.next_u32() % 1024) / 1024.0 * upper
    }
}

const SEED: u64 = 0x5eed;
const VIEW: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

/// A scroll frame holding `rows` list rows, each with a few scattered chips.
fn build_document(rows: u32, seed: u64) -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let mut rng = Lcg::new(seed);
    let sf = tree.insert_scroll_frame(None, VIEW, ViewportOptions::default().with_padding(8.0));
    let contents = tree.scroll_contents(sf).expect("new scroll frame has contents");
    for i in 0..rows {
        let y = f64::from(i) * 24.0;
        let row = MorphDesc::plain(Rect::new(0.0, y, 780.0, y + 22.0));
        let row = tree.insert(Some(contents), row);
        for _ in 0..4 {
            let x = rng.next_f64(700.0);
            let chip = MorphDesc::plain(Rect::new(x, y + 2.0, x + 60.0, y + 20.0))
                .with_color(Color::from_rgb8(40, 120, 200));
            let chip = tree.insert(Some(row), chip);
            if rng.next_u32() % 4 == 0 {
                tree.add_shadow(chip, Vec2::new(2.0, 2.0), Color::BLACK);
            }
        }
    }
    tree.adjust_bounds(contents);
    let _ = tree.take_damage();
    (tree, sf)
}

fn bench_morph_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_morph");

    for &rows in &[100_u32, 1_000, 10_000] {
        let (tree, sf) = build_document(rows, SEED);

        group.bench_function(format!("paint_window(rows={rows})"), |b| {
            let mut canvas = RecordingCanvas::new();
            b.iter(|| {
                canvas.clear();
                tree.paint(sf, &mut canvas, None);
                black_box(canvas.fills().len());
            });
        });

        group.bench_function(format!("scroll_and_repaint(rows={rows})"), |b| {
            b.iter_batched(
                || build_document(rows, SEED),
                |(mut tree, sf)| {
                    tree.scroll_by(sf, Vec2::new(0.0, -240.0));
                    let damage = tree.take_damage();
                    let mut canvas = RecordingCanvas::new();
                    for rect in damage.dirty_rects {
                        tree.paint(sf, &mut canvas, Some(rect));
                    }
                    black_box(canvas.fills().len());
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("refit_contents(rows={rows})"), |b| {
            b.iter_batched(
                || build_document(rows, SEED),
                |(mut tree, sf)| {
                    let contents = tree.scroll_contents(sf);
                    if let Some(contents) = contents {
                        tree.react_to_drop_of(contents);
                    }
                    black_box(tree.take_damage().len());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_morph_paint);
criterion_main!(benches);
