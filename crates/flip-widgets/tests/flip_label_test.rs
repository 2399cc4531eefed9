//! End-to-end behavior of the flip label driven by a 16ms frame clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use flip_core::geometry::Rect;
use flip_layout::{HorizontalAlignment, VerticalAlignment};
use flip_style::{Color, Font};
use flip_text::{ProportionalMetrics, TextMetrics};
use flip_widgets::{
    DrawLayer, FlipLabel, FlipPhase, LabelError, MIN_FLIP_DURATION, RecordingSurface,
    TickOutcome,
};

const FRAME: Duration = Duration::from_millis(16);

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 50.0)
}

fn log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

fn handler(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Option<impl FnOnce(bool) + 'static> {
    let log = Rc::clone(log);
    Some(move |finished: bool| log.borrow_mut().push(format!("{name}:{finished}")))
}

#[test]
fn short_duration_is_raised_to_floor() {
    let mut label = FlipLabel::new();
    let timing = label
        .set_text_with_flip_animation(Duration::from_millis(100), "abc", None::<fn(bool)>)
        .clone();
    assert_eq!(timing.total, MIN_FLIP_DURATION);
    assert_eq!(timing.total, Duration::from_millis(750));
}

#[test]
fn hi_completes_at_two_seconds() {
    let events = log();
    let mut label = FlipLabel::new();
    label.set_text_with_flip_animation(Duration::from_secs(2), "HI", handler(&events, "hi"));

    // Empty label: nothing to fade, nothing drawn during the fade window.
    let mut surface = RecordingSurface::new();
    for _ in 0..31 {
        label.tick(FRAME);
    }
    label.render(bounds(), &mut surface);
    assert!(surface.is_empty());
    assert_eq!(label.phase(), FlipPhase::FadingOut);

    for _ in 31..124 {
        assert_eq!(label.tick(FRAME), TickOutcome::Running);
    }
    assert!(events.borrow().is_empty(), "fired early: {:?}", events.borrow());

    assert_eq!(label.tick(FRAME), TickOutcome::Completed);
    assert_eq!(*events.borrow(), vec!["hi:true".to_string()]);
    assert_eq!(label.sequencer().elapsed(), Duration::from_secs(2));

    for _ in 0..10 {
        assert_eq!(label.tick(FRAME), TickOutcome::Idle);
    }
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn glyphs_flip_staggered() {
    let mut label = FlipLabel::new();
    label.set_text_with_flip_animation(Duration::from_secs(2), "HI", None::<fn(bool)>);

    let mut first_visible = [None, None];
    for frame in 1..=125 {
        label.tick(FRAME);
        let mut surface = RecordingSurface::new();
        label.render(bounds(), &mut surface);
        for draw in surface.layer(DrawLayer::Text) {
            let slot = if draw.text == "H" { 0 } else { 1 };
            first_visible[slot].get_or_insert(frame);
        }
    }
    let (h, i) = (first_visible[0].unwrap(), first_visible[1].unwrap());
    assert!(h < i, "H at {h}, I at {i}");
    // H starts at 0.5s, I at 1.4s.
    assert_eq!(h, 32);
    assert_eq!(i, 88);
}

#[test]
fn interrupt_reports_false_before_new_run() {
    let events = log();
    let mut label = FlipLabel::new();
    label.set_text("start");
    label.set_text_with_flip_animation(Duration::from_secs(1), "first", handler(&events, "first"));
    for _ in 0..20 {
        label.tick(FRAME);
    }

    label.set_text_with_flip_animation(Duration::from_secs(1), "second", handler(&events, "second"));
    assert_eq!(*events.borrow(), vec!["first:false".to_string()]);
    assert_eq!(label.text(), "second");
    assert!(label.is_animating());

    while label.tick(FRAME) == TickOutcome::Running {}
    assert_eq!(
        *events.borrow(),
        vec!["first:false".to_string(), "second:true".to_string()]
    );
}

#[test]
fn interrupt_keeps_partial_state_visible() {
    let mut label = FlipLabel::new();
    label.set_text_with_flip_animation(Duration::from_secs(1), "AB", None::<fn(bool)>);
    for _ in 0..50 {
        label.tick(FRAME);
    }
    let mut before = RecordingSurface::new();
    label.render(bounds(), &mut before);
    let shown: Vec<_> = before.texts(DrawLayer::Text).into_iter().map(str::to_owned).collect();
    assert!(!shown.is_empty());

    label.set_text_with_flip_animation(Duration::from_secs(1), "CD", None::<fn(bool)>);
    let mut after = RecordingSurface::new();
    label.render(bounds(), &mut after);
    let draws: Vec<_> = after.layer(DrawLayer::Text).collect();
    let texts: Vec<_> = draws.iter().map(|d| d.text.clone()).collect();
    assert_eq!(texts, shown);
    for (a, b) in before.layer(DrawLayer::Text).zip(draws) {
        assert_eq!(a, b);
    }
}

#[test]
fn shadow_applies_to_both_layers() {
    let mut label = FlipLabel::new();
    label.set_shadow_color(Color::GRAY);
    label.set_text("old");
    label.set_text_with_flip_animation(Duration::from_secs(1), "new", None::<fn(bool)>);

    // Overlap so both layers are on screen at once.
    label.set_config(label.config().flip_overlap(1.0));
    label.set_text_with_flip_animation(Duration::from_secs(1), "new", None::<fn(bool)>);
    for _ in 0..10 {
        label.tick(FRAME);
    }

    let mut surface = RecordingSurface::new();
    label.render(bounds(), &mut surface);
    let text: Vec<_> = surface.layer(DrawLayer::Text).collect();
    let shadow: Vec<_> = surface.layer(DrawLayer::Shadow).collect();
    assert!(!text.is_empty());
    assert_eq!(text.len(), shadow.len());

    let offset = label.shadow_offset();
    for (s, t) in shadow.iter().zip(&text) {
        assert_eq!(s.text, t.text);
        assert_eq!(s.origin.x, t.origin.x + offset.dx);
        assert_eq!(s.origin.y, t.origin.y + offset.dy);
        assert_eq!(s.transform.rotation, t.transform.rotation);
        assert_eq!(s.color.a(), t.color.a());
    }

    // Every shadow precedes its glyph.
    let draws = surface.draws();
    for pair in draws.chunks(2) {
        assert_eq!(pair[0].layer, DrawLayer::Shadow);
        assert_eq!(pair[1].layer, DrawLayer::Text);
    }
}

#[test]
fn clearing_shadow_disables_it() {
    let mut label = FlipLabel::new();
    label.set_text("x");
    label.set_shadow_color(Color::GRAY);
    label.set_shadow_color(None);
    let mut surface = RecordingSurface::new();
    label.render(bounds(), &mut surface);
    assert_eq!(surface.texts(DrawLayer::Shadow), Vec::<&str>::new());
    assert_eq!(surface.texts(DrawLayer::Text), vec!["x"]);
}

#[test]
fn rejected_font_keeps_previous() {
    let mut label = FlipLabel::new();
    let before = label.font().clone();
    let err = label.set_font(None).unwrap_err();
    assert!(matches!(err, LabelError::InvalidArgument { property: "font", .. }));
    assert_eq!(label.font(), &before);
}

#[test]
fn rect_matches_render_origin() {
    let metrics = TextMetrics::new(ProportionalMetrics::new().line_height_em(1.0));
    let mut label = FlipLabel::new().with_metrics(metrics);
    label.set_font(Font::system(20.0)).unwrap();
    label.set_text("AB");
    label.set_horizontal_alignment(HorizontalAlignment::Center);
    label.set_vertical_alignment(VerticalAlignment::Center);

    let rect = label.text_rect_for_bounds(bounds());
    assert_eq!(rect, Rect::new(90.0, 15.0, 20.0, 20.0));

    let mut surface = RecordingSurface::new();
    label.render(bounds(), &mut surface);
    let draw = &surface.draws()[0];
    assert_eq!(draw.origin.x, rect.x);
    assert_eq!(draw.origin.y, rect.y + 20.0);
}

/// Horizontal gap between the drawn "A" and "B", and the advance of "A"
/// under the font they were drawn with.
fn drawn_gap(label: &FlipLabel, surface: &RecordingSurface) -> (f32, f32, Font) {
    let draws: Vec<_> = surface.layer(DrawLayer::Text).collect();
    let a = draws.iter().find(|d| d.text == "A").expect("A drawn");
    let b = draws.iter().find(|d| d.text == "B").expect("B drawn");
    let advance = label.metrics().measure("A", &a.font).unwrap().width;
    (b.origin.x - a.origin.x, advance, a.font.clone())
}

fn tick_frames(label: &mut FlipLabel, frames: usize) {
    for _ in 0..frames {
        label.tick(FRAME);
    }
}

#[test]
fn auto_fit_glyphs_spaced_by_drawn_font_before_first_layout() {
    let mut label = FlipLabel::new();
    label.set_dynamic_font_size(true);
    label.set_text_with_flip_animation(Duration::from_secs(1), "AB", None::<fn(bool)>);
    // 896ms: A has landed, B is mid-flip.
    tick_frames(&mut label, 56);

    let mut surface = RecordingSurface::new();
    label.render(Rect::new(0.0, 0.0, 400.0, 100.0), &mut surface);
    let (gap, advance, font) = drawn_gap(&label, &surface);
    assert!(font.size() > 17.0, "auto-fit should grow the font: {font:?}");
    assert!((gap - advance).abs() < 1e-3, "gap {gap}, advance {advance}");
}

#[test]
fn auto_fit_glyphs_follow_resize_mid_run() {
    let mut label = FlipLabel::new();
    label.set_dynamic_font_size(true);
    label.layout(Rect::new(0.0, 0.0, 100.0, 100.0));
    label.set_text_with_flip_animation(Duration::from_secs(1), "AB", None::<fn(bool)>);
    tick_frames(&mut label, 56);

    let mut wide = RecordingSurface::new();
    label.render(Rect::new(0.0, 0.0, 100.0, 100.0), &mut wide);
    let (wide_gap, wide_advance, _) = drawn_gap(&label, &wide);
    assert!((wide_gap - wide_advance).abs() < 1e-3);

    let mut narrow = RecordingSurface::new();
    label.render(Rect::new(0.0, 0.0, 40.0, 100.0), &mut narrow);
    let (gap, advance, _) = drawn_gap(&label, &narrow);
    assert!(gap < wide_gap, "narrow {gap} should be tighter than {wide_gap}");
    assert!((gap - advance).abs() < 1e-3, "gap {gap}, advance {advance}");
}

#[test]
fn font_change_mid_run_respaces_glyphs() {
    let mut label = FlipLabel::new();
    label.set_text_with_flip_animation(Duration::from_secs(1), "AB", None::<fn(bool)>);
    tick_frames(&mut label, 56);
    label.set_font(Font::system(40.0)).unwrap();

    let mut surface = RecordingSurface::new();
    label.render(bounds(), &mut surface);
    let (gap, advance, font) = drawn_gap(&label, &surface);
    assert_eq!(font, Font::system(40.0));
    assert!((gap - advance).abs() < 1e-3, "gap {gap}, advance {advance}");
}

#[test]
fn chained_run_starts_after_tick_returns() {
    let label = Rc::new(RefCell::new(FlipLabel::new()));
    let finished = Rc::new(Cell::new(None));
    let flag = Rc::clone(&finished);
    label.borrow_mut().set_text_with_flip_animation(
        MIN_FLIP_DURATION,
        "one",
        Some(move |done: bool| flag.set(Some(done))),
    );

    let mut outcome = TickOutcome::Running;
    while outcome == TickOutcome::Running {
        outcome = label.borrow_mut().tick(FRAME);
    }
    assert_eq!(outcome, TickOutcome::Completed);
    assert_eq!(finished.take(), Some(true));

    // The borrow from `tick` has ended, so the host can start the next run.
    label
        .borrow_mut()
        .set_text_with_flip_animation(MIN_FLIP_DURATION, "two", None::<fn(bool)>);
    let label = label.borrow();
    assert!(label.is_animating());
    assert_eq!(label.sequencer().run().map(|run| run.old_text()), Some("one"));
}
