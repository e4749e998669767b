// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bit;
use crate::column::{reconcile, Column, Symbol};
use crate::palette::Rgb;
use crate::surface::{NodeId, Surface, SurfaceStyle};

pub const MAX_COLUMNS: u16 = 100;
pub const MIN_INTERVAL_MS: u64 = 1;
pub const MAX_INTERVAL_MS: u64 = 60_000;

#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    pub interval: Duration,
    pub column_count: u16,
    pub p_zero: f64,
    pub p_one: f64,
    pub text_color: Rgb,
    pub background_color: Rgb,
}

impl SceneConfig {
    fn style(&self) -> SurfaceStyle {
        SurfaceStyle {
            text: self.text_color,
            background: self.background_color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneUpdate {
    TextColor(Rgb),
    BackgroundColor(Rgb),
    Speed(f64),
    ColumnCount(f64),
    PZero(f64),
    POne(f64),
}

// The single live emission-loop handle. Replacing it is the only way to
// change cadence; a ticker has no state beyond its deadline.
#[derive(Clone, Copy, Debug)]
struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        if now > self.next {
            self.next = now;
        }
    }
}

pub struct Scene {
    config: SceneConfig,
    columns: Vec<Column>,
    ticker: Option<Ticker>,
    pending_columns: Option<u16>,
    container: NodeId,
    rng: StdRng,
}

impl Scene {
    pub fn new(config: SceneConfig, container: NodeId) -> Self {
        Self {
            config,
            columns: Vec::new(),
            ticker: None,
            pending_columns: None,
            container,
            rng: StdRng::seed_from_u64(0x7654321),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.ticker.map(|t| t.next)
    }

    pub fn pending(&self) -> bool {
        self.pending_columns.is_some()
    }

    pub fn start(&mut self, surface: &mut dyn Surface, now: Instant) {
        surface.set_style(self.container, self.config.style());
        reconcile(
            &mut self.columns,
            self.config.column_count as usize,
            surface,
            self.container,
        );
        self.restart(now);
    }

    fn cancel(&mut self) {
        self.ticker = None;
    }

    fn restart(&mut self, now: Instant) {
        self.ticker = Some(Ticker::new(self.config.interval, now));
    }

    pub fn apply(&mut self, update: SceneUpdate, surface: &mut dyn Surface, now: Instant) {
        match update {
            SceneUpdate::TextColor(color) => {
                self.config.text_color = color;
                surface.set_style(self.container, self.config.style());
            }
            SceneUpdate::BackgroundColor(color) => {
                self.config.background_color = color;
                surface.set_style(self.container, self.config.style());
            }
            SceneUpdate::Speed(ms) => {
                if !ms.is_finite() {
                    return;
                }
                let ms = ms.round().clamp(MIN_INTERVAL_MS as f64, MAX_INTERVAL_MS as f64);
                self.config.interval = Duration::from_millis(ms as u64);
                self.cancel();
                self.restart(now);
            }
            SceneUpdate::ColumnCount(raw) => {
                if !raw.is_finite() {
                    return;
                }
                // magnitude coercion, as the inputs deliver it: -20 -> 20,
                // 150 -> 100, -150 -> 100
                let capped = if raw.abs() > MAX_COLUMNS as f64 {
                    MAX_COLUMNS as f64
                } else {
                    raw
                };
                let count = capped.abs().trunc() as u16;
                self.config.column_count = count;
                self.cancel();
                self.pending_columns = Some(count);
            }
            SceneUpdate::PZero(raw) => self.update_probability(raw, true, now),
            SceneUpdate::POne(raw) => self.update_probability(raw, false, now),
        }
    }

    fn update_probability(&mut self, raw: f64, zero: bool, now: Instant) {
        if !raw.is_finite() {
            return;
        }
        let capped = if raw.abs() > 1.0 { 1.0 } else { raw };
        let target = capped.abs();

        if zero {
            self.config.p_zero = target;
            if target + self.config.p_one > 1.0 {
                self.config.p_one = 1.0 - target;
            }
        } else {
            self.config.p_one = target;
            if target + self.config.p_zero > 1.0 {
                self.config.p_zero = 1.0 - target;
            }
        }

        self.cancel();
        self.restart(now);
    }

    // Completes a deferred column-count change: the old loop is already
    // cancelled, so the order is stop -> reconcile -> start.
    pub fn settle(&mut self, surface: &mut dyn Surface, now: Instant) {
        let Some(count) = self.pending_columns.take() else {
            return;
        };
        reconcile(&mut self.columns, count as usize, surface, self.container);
        self.restart(now);
    }

    pub fn tick_due(&self, now: Instant) -> bool {
        self.ticker.as_ref().is_some_and(|t| t.due(now))
    }

    pub fn tick(&mut self, surface: &mut dyn Surface, now: Instant) {
        let Some(ticker) = self.ticker.as_mut() else {
            return;
        };
        if !ticker.due(now) {
            return;
        }
        ticker.advance(now);

        let container_box = surface.bounding_box(self.container);

        for column in &mut self.columns {
            let bit = bit::generate(&mut self.rng, self.config.p_zero, self.config.p_one);
            let node = surface.create_node();
            surface.set_content(node, bit.glyph());
            surface.attach_front(column.node, node);

            let had_prior = !column.is_empty();
            column.symbols.push_front(Symbol { bit, node });
            if !had_prior {
                continue;
            }

            let Some(container_rect) = container_box else {
                continue;
            };
            let Some(tail) = column.tail() else {
                continue;
            };
            match surface.bounding_box(tail.node) {
                Some(rect) if rect.outside_of(container_rect) => {
                    surface.detach(column.node, tail.node);
                    column.symbols.pop_back();
                }
                Some(_) => {}
                None => {
                    // surface lost the node; drop the bookkeeping entry
                    column.symbols.pop_back();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::bit::Bit;
    use crate::runtime::ColorMode;
    use crate::surface::TextSurface;

    const HEIGHT: u16 = 6;

    fn rgb(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn config() -> SceneConfig {
        SceneConfig {
            interval: Duration::from_millis(50),
            column_count: 2,
            p_zero: 1.0,
            p_one: 0.0,
            text_color: rgb(255),
            background_color: rgb(0),
        }
    }

    fn started() -> (Scene, TextSurface, Instant) {
        let mut surface = TextSurface::new(10, HEIGHT, ColorMode::Mono);
        let mut scene = Scene::new(config(), surface.root());
        let now = Instant::now();
        scene.start(&mut surface, now);
        (scene, surface, now)
    }

    fn run_ticks(scene: &mut Scene, surface: &mut TextSurface, from: Instant, ticks: u32) {
        let mut now = from;
        for _ in 0..ticks {
            now += scene.config().interval;
            scene.tick(surface, now);
        }
    }

    #[test]
    fn start_attaches_columns_and_arms_the_ticker() {
        let (scene, surface, now) = started();
        assert_eq!(surface.child_count(surface.root()), 2);
        assert_eq!(scene.deadline(), Some(now + Duration::from_millis(50)));
    }

    #[test]
    fn every_tick_emits_one_head_symbol_per_column() {
        let (mut scene, mut surface, now) = started();
        run_ticks(&mut scene, &mut surface, now, 3);
        for column in scene.columns() {
            assert_eq!(column.symbols.len(), 3);
            assert_eq!(column.symbols.front().unwrap().bit, Bit::Zero);
        }
    }

    #[test]
    fn all_mass_on_zero_makes_every_head_deterministic() {
        let (mut scene, mut surface, now) = started();
        run_ticks(&mut scene, &mut surface, now, 10);
        for column in scene.columns() {
            assert!(column.symbols.iter().all(|s| s.bit == Bit::Zero));
        }
    }

    #[test]
    fn column_length_stabilizes_at_container_height() {
        let (mut scene, mut surface, now) = started();
        run_ticks(&mut scene, &mut surface, now, 25);
        for column in scene.columns() {
            assert_eq!(column.symbols.len(), HEIGHT as usize);
        }
        // once saturated, emission and eviction balance out
        run_ticks(&mut scene, &mut surface, now + Duration::from_secs(10), 5);
        for column in scene.columns() {
            assert_eq!(column.symbols.len(), HEIGHT as usize);
        }
    }

    #[test]
    fn tick_before_deadline_is_a_no_op() {
        let (mut scene, mut surface, now) = started();
        scene.tick(&mut surface, now + Duration::from_millis(10));
        for column in scene.columns() {
            assert!(column.is_empty());
        }
    }

    #[test]
    fn probability_update_forces_sibling_down() {
        let (mut scene, mut surface, now) = started();
        scene.apply(SceneUpdate::PZero(0.4), &mut surface, now);
        scene.apply(SceneUpdate::POne(0.5), &mut surface, now);
        scene.apply(SceneUpdate::PZero(0.9), &mut surface, now);

        let cfg = scene.config();
        assert_eq!(cfg.p_zero, 0.9);
        assert!((cfg.p_one - 0.1).abs() < 1e-12);
        assert_eq!(cfg.p_zero + cfg.p_one, 1.0);
    }

    #[test]
    fn probability_magnitude_is_coerced() {
        let (mut scene, mut surface, now) = started();
        scene.apply(SceneUpdate::POne(-0.5), &mut surface, now);
        assert_eq!(scene.config().p_one, 0.5);

        scene.apply(SceneUpdate::PZero(1.5), &mut surface, now);
        assert_eq!(scene.config().p_zero, 1.0);
        assert_eq!(scene.config().p_one, 0.0);
    }

    #[test]
    fn column_count_is_clamped_and_coerced() {
        let (mut scene, mut surface, now) = started();

        scene.apply(SceneUpdate::ColumnCount(150.0), &mut surface, now);
        assert_eq!(scene.config().column_count, 100);

        scene.apply(SceneUpdate::ColumnCount(-20.0), &mut surface, now);
        assert_eq!(scene.config().column_count, 20);

        scene.apply(SceneUpdate::ColumnCount(-150.0), &mut surface, now);
        assert_eq!(scene.config().column_count, 100);
    }

    #[test]
    fn speed_update_replaces_the_ticker_immediately() {
        let (mut scene, mut surface, start) = started();
        let later = start + Duration::from_millis(30);
        scene.apply(SceneUpdate::Speed(10.0), &mut surface, later);

        assert_eq!(scene.config().interval, Duration::from_millis(10));
        assert_eq!(scene.deadline(), Some(later + Duration::from_millis(10)));
    }

    #[test]
    fn speed_is_clamped_to_sane_bounds() {
        let (mut scene, mut surface, now) = started();
        scene.apply(SceneUpdate::Speed(0.0), &mut surface, now);
        assert_eq!(scene.config().interval, Duration::from_millis(1));

        scene.apply(SceneUpdate::Speed(1e9), &mut surface, now);
        assert_eq!(scene.config().interval, Duration::from_millis(60_000));
    }

    #[test]
    fn column_count_change_defers_the_restart_to_settle() {
        let (mut scene, mut surface, now) = started();
        scene.apply(SceneUpdate::ColumnCount(8.0), &mut surface, now);

        // loop stopped, structure untouched until the next opportunity
        assert_eq!(scene.deadline(), None);
        assert!(scene.pending());
        assert_eq!(surface.child_count(surface.root()), 2);

        let later = now + Duration::from_millis(5);
        scene.settle(&mut surface, later);
        assert!(!scene.pending());
        assert_eq!(surface.child_count(surface.root()), 8);
        assert_eq!(scene.deadline(), Some(later + scene.config().interval));
    }

    #[test]
    fn color_updates_never_touch_the_ticker() {
        let (mut scene, mut surface, now) = started();
        let deadline = scene.deadline();

        scene.apply(SceneUpdate::TextColor(rgb(10)), &mut surface, now);
        scene.apply(SceneUpdate::BackgroundColor(rgb(20)), &mut surface, now);

        assert_eq!(scene.deadline(), deadline);
        assert_eq!(surface.style().text, rgb(10));
        assert_eq!(surface.style().background, rgb(20));
    }

    #[test]
    fn probabilities_are_read_fresh_each_tick() {
        let (mut scene, mut surface, now) = started();
        let t1 = now + scene.config().interval;
        scene.tick(&mut surface, t1);
        assert!(scene
            .columns()
            .iter()
            .all(|c| c.symbols.front().unwrap().bit == Bit::Zero));

        scene.apply(SceneUpdate::PZero(0.0), &mut surface, t1);
        scene.apply(SceneUpdate::POne(1.0), &mut surface, t1);

        let t2 = t1 + scene.config().interval;
        scene.tick(&mut surface, t2);
        assert!(scene
            .columns()
            .iter()
            .all(|c| c.symbols.front().unwrap().bit == Bit::One));
    }

    #[test]
    fn shrinking_discards_offscreen_symbols_with_their_columns() {
        let (mut scene, mut surface, now) = started();
        run_ticks(&mut scene, &mut surface, now, 4);
        let dropped = scene.columns()[1].node;

        scene.apply(SceneUpdate::ColumnCount(1.0), &mut surface, now);
        scene.settle(&mut surface, now + Duration::from_millis(1));

        assert_eq!(scene.columns().len(), 1);
        assert_eq!(surface.bounding_box(dropped), None);
        assert_eq!(surface.child_count(surface.root()), 1);
    }
}
