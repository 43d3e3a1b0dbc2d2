//! Transient visual state: animated counters, notification banners, and
//! click ripples. Everything here is driven by explicit `Instant`s from the
//! frame loop and cleans itself up when its window elapses.

use std::time::{Duration, Instant};

use eframe::egui::Pos2;

/// How long a dashboard counter ramps from zero to its target
pub const COUNTER_RAMP: Duration = Duration::from_millis(1000);
/// Informational banners dismiss themselves after this long
pub const BANNER_AUTO_DISMISS: Duration = Duration::from_millis(5000);
/// A click ripple lives this long
pub const RIPPLE_LIFETIME: Duration = Duration::from_millis(600);

// ============================================================================
// Animated counters
// ============================================================================

/// How a counter renders its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    /// Whole number
    Count,
    /// Two-decimal currency
    Currency,
}

/// A number animating from zero to its target over [`COUNTER_RAMP`]
#[derive(Debug, Clone)]
pub struct CountUp {
    target: f64,
    style: CounterStyle,
    started: Instant,
}

impl CountUp {
    pub fn new(target: f64, style: CounterStyle, now: Instant) -> Self {
        Self {
            target,
            style,
            started: now,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Re-arm toward a new target, restarting the ramp
    pub fn retarget(&mut self, target: f64, now: Instant) {
        if (target - self.target).abs() > f64::EPSILON {
            self.target = target;
            self.started = now;
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / COUNTER_RAMP.as_secs_f64()).min(1.0)
    }

    pub fn value(&self, now: Instant) -> f64 {
        self.target * self.progress(now)
    }

    pub fn finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Display text: currency gets two decimals, counts round to whole
    pub fn text(&self, now: Instant) -> String {
        match self.style {
            CounterStyle::Currency => crate::format_amount(self.value(now)),
            CounterStyle::Count => format!("{}", self.value(now).round() as i64),
        }
    }
}

// ============================================================================
// Notification banners
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    created: Instant,
}

impl Banner {
    fn expired(&self, now: Instant) -> bool {
        // Error banners stay until the user dismisses them
        self.kind != BannerKind::Error
            && now.saturating_duration_since(self.created) >= BANNER_AUTO_DISMISS
    }
}

/// The stack of visible banners
#[derive(Default)]
pub struct BannerTray {
    banners: Vec<Banner>,
}

impl BannerTray {
    pub fn push(&mut self, kind: BannerKind, message: impl Into<String>, now: Instant) {
        self.banners.push(Banner {
            kind,
            message: message.into(),
            created: now,
        });
    }

    /// Drop non-error banners past their window
    pub fn sweep(&mut self, now: Instant) {
        self.banners.retain(|b| !b.expired(now));
    }

    /// Explicit dismissal (click), any kind
    pub fn dismiss(&mut self, index: usize) {
        if index < self.banners.len() {
            self.banners.remove(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    /// Earliest upcoming auto-dismiss deadline, for repaint scheduling
    pub fn next_deadline(&self) -> Option<Instant> {
        self.banners
            .iter()
            .filter(|b| b.kind != BannerKind::Error)
            .map(|b| b.created + BANNER_AUTO_DISMISS)
            .min()
    }
}

// ============================================================================
// Click ripples
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Ripple {
    pub center: Pos2,
    started: Instant,
}

impl Ripple {
    /// Age as a 0..=1 fraction of the lifetime
    pub fn age_fraction(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / RIPPLE_LIFETIME.as_secs_f32()).min(1.0)
    }
}

/// Live ripples; spawn on click, self-clean after [`RIPPLE_LIFETIME`]
#[derive(Default)]
pub struct RippleLayer {
    ripples: Vec<Ripple>,
}

impl RippleLayer {
    pub fn spawn(&mut self, center: Pos2, now: Instant) {
        self.ripples.push(Ripple {
            center,
            started: now,
        });
    }

    pub fn sweep(&mut self, now: Instant) {
        self.ripples.retain(|r| r.age_fraction(now) < 1.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_ramps_linearly_and_lands_on_target() {
        let t0 = Instant::now();
        let c = CountUp::new(200.0, CounterStyle::Count, t0);

        assert_eq!(c.value(t0), 0.0);
        let half = c.value(t0 + Duration::from_millis(500));
        assert!((half - 100.0).abs() < 1.0);
        assert_eq!(c.value(t0 + COUNTER_RAMP), 200.0);
        assert!(c.finished(t0 + COUNTER_RAMP));
    }

    #[test]
    fn currency_counters_render_two_decimals() {
        let t0 = Instant::now();
        let c = CountUp::new(4.5, CounterStyle::Currency, t0);
        assert_eq!(c.text(t0 + COUNTER_RAMP), "$4.50");

        let n = CountUp::new(12.0, CounterStyle::Count, t0);
        assert_eq!(n.text(t0 + COUNTER_RAMP), "12");
    }

    #[test]
    fn retarget_restarts_the_ramp_only_on_change() {
        let t0 = Instant::now();
        let mut c = CountUp::new(10.0, CounterStyle::Count, t0);
        let done = t0 + COUNTER_RAMP;
        assert!(c.finished(done));

        c.retarget(10.0, done);
        assert!(c.finished(done));

        c.retarget(20.0, done);
        assert!(!c.finished(done));
        assert_eq!(c.value(done + COUNTER_RAMP), 20.0);
    }

    #[test]
    fn sweep_drops_only_expired_informational_banners() {
        let t0 = Instant::now();
        let mut tray = BannerTray::default();
        tray.push(BannerKind::Success, "saved", t0);
        tray.push(BannerKind::Error, "broken", t0);
        tray.push(BannerKind::Info, "fresh", t0 + Duration::from_millis(4000));

        tray.sweep(t0 + BANNER_AUTO_DISMISS);

        let kinds: Vec<_> = tray.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BannerKind::Error, BannerKind::Info]);
    }

    #[test]
    fn error_banners_go_away_only_by_dismissal() {
        let t0 = Instant::now();
        let mut tray = BannerTray::default();
        tray.push(BannerKind::Error, "broken", t0);

        tray.sweep(t0 + Duration::from_secs(60));
        assert!(!tray.is_empty());

        tray.dismiss(0);
        assert!(tray.is_empty());
    }

    #[test]
    fn ripples_self_clean_after_their_lifetime() {
        let t0 = Instant::now();
        let mut layer = RippleLayer::default();
        layer.spawn(Pos2::new(10.0, 10.0), t0);

        layer.sweep(t0 + Duration::from_millis(599));
        assert!(!layer.is_empty());

        layer.sweep(t0 + RIPPLE_LIFETIME);
        assert!(layer.is_empty());
    }
}
