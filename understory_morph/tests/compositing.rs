// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for full extents, damage reporting, and clipped painting.
//!
//! These drive the public `Tree` API the way a world loop would: mutate, drain
//! the damage log, and repaint each damaged rectangle into a recording canvas.

use kurbo::{Rect, Vec2};
use peniko::Color;
use quickcheck_macros::quickcheck;
use understory_morph::{MorphDesc, NodeFlags, NodeId, RecordingCanvas, Tree};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::new(x0, y0, x1, y1)
}

#[test]
fn shadow_paints_outside_its_caster() {
    let mut tree = Tree::new();
    let caster = tree.insert(None, MorphDesc::plain(rect(10.0, 10.0, 20.0, 20.0)));
    tree.add_shadow(caster, Vec2::new(5.0, 5.0), Color::BLACK);
    assert_eq!(tree.full_extent(caster), Some(rect(10.0, 10.0, 25.0, 25.0)));

    let mut canvas = RecordingCanvas::new();
    tree.paint(caster, &mut canvas, None);
    let rects: Vec<Rect> = canvas.rects().collect();
    assert_eq!(
        rects,
        vec![rect(10.0, 10.0, 20.0, 20.0), rect(15.0, 15.0, 25.0, 25.0)]
    );
}

#[test]
fn shadow_is_still_clipped_to_the_requested_region() {
    let mut tree = Tree::new();
    let caster = tree.insert(None, MorphDesc::plain(rect(10.0, 10.0, 20.0, 20.0)));
    tree.add_shadow(caster, Vec2::new(5.0, 5.0), Color::BLACK);

    let mut canvas = RecordingCanvas::new();
    tree.paint(caster, &mut canvas, Some(rect(0.0, 0.0, 12.0, 12.0)));
    assert_eq!(canvas.rects().collect::<Vec<_>>(), vec![rect(10.0, 10.0, 12.0, 12.0)]);

    canvas.clear();
    tree.paint(caster, &mut canvas, Some(rect(18.0, 18.0, 30.0, 30.0)));
    assert_eq!(
        canvas.rects().collect::<Vec<_>>(),
        vec![rect(18.0, 18.0, 20.0, 20.0), rect(18.0, 18.0, 25.0, 25.0)]
    );
}

/// A card with a shadow and a child, the shadow reaching past the card.
fn shadowed_card(tree: &mut Tree) -> NodeId {
    let card = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 100.0, 100.0)));
    tree.insert(Some(card), MorphDesc::plain(rect(10.0, 10.0, 50.0, 50.0)));
    tree.add_shadow(card, Vec2::new(8.0, 8.0), Color::BLACK);
    card
}

#[quickcheck]
fn zero_area_region_never_paints(x: i8, y: i8, len: u8, vertical: bool) -> bool {
    let mut tree = Tree::new();
    let card = shadowed_card(&mut tree);
    let (x, y, len) = (f64::from(x), f64::from(y), f64::from(len));
    let region = if vertical {
        rect(x, y, x, y + len)
    } else {
        rect(x, y, x + len, y)
    };

    let mut canvas = RecordingCanvas::new();
    tree.paint(card, &mut canvas, Some(region));
    canvas.fills().is_empty()
}

#[quickcheck]
fn hidden_morph_never_paints(x: i8, y: i8, w: u8, h: u8) -> bool {
    let mut tree = Tree::new();
    let card = shadowed_card(&mut tree);
    tree.set_flags(card, NodeFlags::DRAGGABLE);
    let region = Rect::from_origin_size(
        (f64::from(x), f64::from(y)),
        (f64::from(w), f64::from(h)),
    );

    let mut canvas = RecordingCanvas::new();
    tree.paint(card, &mut canvas, Some(region));
    tree.paint(card, &mut canvas, None);
    canvas.fills().is_empty()
}

#[test]
fn region_outside_the_morph_paints_nothing() {
    let mut tree = Tree::new();
    let card = shadowed_card(&mut tree);
    let mut canvas = RecordingCanvas::new();
    tree.paint(card, &mut canvas, Some(rect(200.0, 200.0, 300.0, 300.0)));
    assert!(canvas.fills().is_empty());
}

#[test]
fn repainting_damage_covers_old_and_new_positions() {
    let mut tree = Tree::new();
    let world = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 200.0, 200.0)));
    let card = tree.insert(Some(world), MorphDesc::plain(rect(10.0, 10.0, 40.0, 40.0)));
    tree.add_shadow(card, Vec2::new(4.0, 4.0), Color::BLACK);
    let _ = tree.take_damage();

    tree.move_by(card, Vec2::new(100.0, 0.0));
    let damage = tree.take_damage();
    assert_eq!(damage.union_rect(), Some(rect(10.0, 10.0, 144.0, 44.0)));

    let mut canvas = RecordingCanvas::new();
    for dirty in &damage.dirty_rects {
        tree.paint(world, &mut canvas, Some(*dirty));
    }
    assert_eq!(canvas.painted_area(), damage.union_rect());
}

#[test]
fn color_changes_show_after_redraw() {
    let mut tree = Tree::new();
    let n = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 10.0, 10.0)));
    let before = tree.image_revision(n).unwrap();
    tree.set_color(n, Color::WHITE);
    assert!(tree.image_revision(n).unwrap() > before);
    assert_eq!(tree.appearance(n).unwrap().fill, Color::WHITE);
    assert_eq!(tree.damage().len(), 1);
}

#[test]
fn removing_a_caster_takes_its_shadow_along() {
    let mut tree = Tree::new();
    let world = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 100.0, 100.0)));
    let caster = tree.insert(Some(world), MorphDesc::plain(rect(10.0, 10.0, 20.0, 20.0)));
    let shadow = tree
        .add_shadow(caster, Vec2::new(3.0, 3.0), Color::BLACK)
        .unwrap();
    let _ = tree.take_damage();

    tree.remove(caster);
    assert!(!tree.is_alive(shadow));
    assert_eq!(
        tree.take_damage().dirty_rects,
        vec![rect(10.0, 10.0, 23.0, 23.0)]
    );
}

#[quickcheck]
fn move_there_and_back_restores_every_bounds(dx: i16, dy: i16) -> bool {
    let mut tree = Tree::new();
    let world = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 100.0, 100.0)));
    let frame = tree.insert(Some(world), MorphDesc::frame(rect(10.0, 10.0, 60.0, 60.0)));
    let a = tree.insert(Some(frame), MorphDesc::plain(rect(15.0, 15.0, 25.0, 25.0)));
    let b = tree.insert(Some(a), MorphDesc::plain(rect(16.0, 16.0, 18.0, 18.0)));
    tree.add_shadow(a, Vec2::new(2.0, 2.0), Color::BLACK);
    let ids = [world, frame, a, b];
    let before: Vec<_> = ids.iter().map(|&id| tree.full_extent(id)).collect();

    let delta = Vec2::new(f64::from(dx), f64::from(dy));
    tree.move_by(world, delta);
    tree.move_by(world, -delta);
    let after: Vec<_> = ids.iter().map(|&id| tree.full_extent(id)).collect();
    before == after
}
