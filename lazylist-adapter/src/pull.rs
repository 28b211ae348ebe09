use crate::{RefreshError, Spring, SpringConfig};

/// Where the pull gesture currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PullPhase {
    /// No gesture and no animation.
    Idle,
    /// A finger is down; `pull_distance` follows the damped drag.
    Dragging,
    /// The release crossed the threshold; the external refresh operation is
    /// running while the indicator holds at the threshold.
    Committed,
    /// The indicator is springing back to rest.
    Returning,
}

/// Tunables for the pull-to-refresh gesture.
///
/// `content_input_range` and `content_offset_cap` are deliberately
/// independent of `max_overscroll`: the pull distance clamp and the content
/// translation cap are separate knobs that merely share defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullConfig {
    /// Pull distance at which releasing commits a refresh.
    pub threshold: f32,
    /// Fraction of raw finger travel converted into pull distance.
    pub damping_factor: f32,
    /// Pull distance cap, as a multiple of `threshold`.
    pub max_overscroll: f32,
    /// Input range of the content-offset ramp.
    pub content_input_range: f32,
    /// Output cap of the content-offset ramp: content never translates
    /// further than this, however far the finger pulls.
    pub content_offset_cap: f32,
    pub spring: SpringConfig,
}

impl Default for PullConfig {
    fn default() -> Self {
        let threshold = 80.0;
        Self {
            threshold,
            damping_factor: 0.5,
            max_overscroll: 1.5,
            content_input_range: threshold * 1.5,
            content_offset_cap: threshold,
            spring: SpringConfig::default(),
        }
    }
}

impl PullConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_damping_factor(mut self, damping_factor: f32) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    pub fn with_max_overscroll(mut self, max_overscroll: f32) -> Self {
        self.max_overscroll = max_overscroll;
        self
    }

    pub fn with_content_ramp(mut self, input_range: f32, offset_cap: f32) -> Self {
        self.content_input_range = input_range;
        self.content_offset_cap = offset_cap;
        self
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }
}

/// Turns raw pointer movement into a damped pull-to-refresh signal.
///
/// State machine: `Idle → Dragging` on touch at scroll-top, `Dragging →
/// Committed` on release past the threshold (the caller then invokes the
/// external refresh operation exactly once), `Committed → Returning` when the
/// refresh settles, `Dragging → Returning` on release below the threshold,
/// `Returning → Idle` when the spring reaches rest.
///
/// The controller owns no timers: the adapter calls [`Self::tick`] with a
/// monotonic timestamp while [`Self::is_animating`] is true. Disabling or
/// dropping it at any phase is safe; a refresh that settles afterwards is
/// discarded.
#[derive(Clone, Debug)]
pub struct PullGestureController {
    config: PullConfig,
    phase: PullPhase,
    pull_distance: f32,
    start_y: f32,
    frozen_rotation: f32,
    spring: Option<Spring>,
    last_tick_ms: Option<u64>,
    enabled: bool,
}

impl Default for PullGestureController {
    fn default() -> Self {
        Self::new(PullConfig::default())
    }
}

impl PullGestureController {
    pub fn new(config: PullConfig) -> Self {
        Self {
            config,
            phase: PullPhase::Idle,
            pull_distance: 0.0,
            start_y: 0.0,
            frozen_rotation: 0.0,
            spring: None,
            last_tick_ms: None,
            enabled: true,
        }
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    pub fn phase(&self) -> PullPhase {
        self.phase
    }

    /// The damped, clamped pull magnitude. Never negative.
    pub fn pull_distance(&self) -> f32 {
        self.pull_distance
    }

    /// True while the external refresh operation is running.
    pub fn is_refreshing(&self) -> bool {
        self.phase == PullPhase::Committed
    }

    /// True while a spring animation needs [`Self::tick`] calls.
    pub fn is_animating(&self) -> bool {
        self.spring.is_some()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the controller.
    ///
    /// Disabling cancels any animation and resets to `Idle` immediately; a
    /// refresh still in flight may settle later and is then discarded.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset_to_idle();
        }
    }

    /// Gesture start. Only begins a drag from `Idle`, at scroll-top, while
    /// enabled; anything else leaves the controller untouched.
    pub fn pointer_down(&mut self, y: f32, at_top: bool) {
        if !self.enabled || !at_top || self.phase != PullPhase::Idle {
            return;
        }
        ltrace!(y, "pointer_down: begin drag");
        self.phase = PullPhase::Dragging;
        self.start_y = y;
        self.pull_distance = 0.0;
    }

    /// Pointer movement. Moves arriving outside `Dragging` (e.g. after the
    /// gesture already ended) are ignored.
    pub fn pointer_move(&mut self, y: f32, at_top: bool) {
        if self.phase != PullPhase::Dragging {
            return;
        }
        if !at_top {
            // The container scrolled away mid-drag: the pull is abandoned for
            // refresh purposes, but the phase holds until gesture end.
            self.pull_distance = 0.0;
            return;
        }
        let raw = (y - self.start_y).max(0.0) * self.config.damping_factor;
        self.pull_distance = raw.min(self.config.threshold * self.config.max_overscroll);
    }

    /// Gesture end.
    ///
    /// Returns `true` when the release commits a refresh: the caller must
    /// invoke the external refresh operation exactly once and report its
    /// settlement through [`Self::refresh_settled`].
    pub fn pointer_up(&mut self) -> bool {
        if self.phase != PullPhase::Dragging {
            return false;
        }
        if self.pull_distance >= self.config.threshold {
            ltrace!(pull_distance = self.pull_distance, "pointer_up: commit");
            self.phase = PullPhase::Committed;
            self.frozen_rotation = self.rotation_for(self.pull_distance);
            // Hold visually at the threshold while the refresh runs.
            self.start_spring(self.config.threshold);
            true
        } else {
            ltrace!(pull_distance = self.pull_distance, "pointer_up: release");
            self.start_return();
            false
        }
    }

    /// Touch cancel: treated identically to gesture end with the current
    /// pull distance.
    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer_up()
    }

    /// Reports that the external refresh operation settled.
    ///
    /// The outcome is discarded beyond logging: success and failure both
    /// release the indicator. Settles arriving after a disable or reset are
    /// ignored.
    pub fn refresh_settled(&mut self, outcome: Result<(), RefreshError>) {
        if let Err(_err) = &outcome {
            lwarn!(error = %_err, "refresh settled with failure");
        }
        if self.phase != PullPhase::Committed {
            return;
        }
        self.start_return();
    }

    /// Advances the spring animation to `now_ms` and returns the current
    /// pull distance.
    pub fn tick(&mut self, now_ms: u64) -> f32 {
        let dt = match self.last_tick_ms {
            Some(last) => now_ms.saturating_sub(last) as f32 / 1000.0,
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);

        let mut settled = false;
        if let Some(spring) = &mut self.spring {
            if dt > 0.0 {
                spring.advance(dt);
            }
            // An under-damped spring may momentarily dip below zero on the
            // way to rest; the published distance never does.
            self.pull_distance = spring.value().max(0.0);
            settled = spring.is_settled();
        }
        if settled {
            self.spring = None;
            match self.phase {
                PullPhase::Returning => {
                    self.pull_distance = 0.0;
                    self.frozen_rotation = 0.0;
                    self.phase = PullPhase::Idle;
                    self.last_tick_ms = None;
                }
                PullPhase::Committed => {
                    self.pull_distance = self.config.threshold;
                }
                _ => {}
            }
        }
        self.pull_distance
    }

    /// Indicator opacity: ramps 0 → 0.5 → 1 over `[0, threshold/2, threshold]`.
    pub fn indicator_opacity(&self) -> f32 {
        let t = self.config.threshold;
        ramp(
            self.pull_distance,
            &[(0.0, 0.0), (t * 0.5, 0.5), (t, 1.0)],
        )
    }

    /// Indicator scale: ramps 0.5 → 1 over `[0, threshold]`.
    pub fn indicator_scale(&self) -> f32 {
        ramp(
            self.pull_distance,
            &[(0.0, 0.5), (self.config.threshold, 1.0)],
        )
    }

    /// Indicator rotation in degrees: 0° → 180° over `[0, threshold]`.
    ///
    /// While a refresh is running the rotation freezes at its commit-time
    /// value; the surface shows a spinning loader instead.
    pub fn indicator_rotation(&self) -> f32 {
        if self.phase == PullPhase::Committed {
            self.frozen_rotation
        } else {
            self.rotation_for(self.pull_distance)
        }
    }

    /// Content vertical offset: the pull distance mapped over
    /// `[0, content_input_range]` onto `[0, content_offset_cap]`, so content
    /// never travels past the cap even when the finger keeps pulling.
    pub fn content_offset(&self) -> f32 {
        ramp(
            self.pull_distance,
            &[
                (0.0, 0.0),
                (self.config.content_input_range, self.config.content_offset_cap),
            ],
        )
    }

    fn rotation_for(&self, distance: f32) -> f32 {
        ramp(distance, &[(0.0, 0.0), (self.config.threshold, 180.0)])
    }

    fn start_return(&mut self) {
        self.phase = PullPhase::Returning;
        if let Some(spring) = &mut self.spring {
            // Keep the current motion when a hold animation is interrupted.
            spring.retarget(0.0);
        } else {
            self.start_spring(0.0);
        }
    }

    fn start_spring(&mut self, target: f32) {
        self.spring = Some(Spring::new(self.pull_distance, target, self.config.spring));
        self.last_tick_ms = None;
    }

    fn reset_to_idle(&mut self) {
        self.phase = PullPhase::Idle;
        self.pull_distance = 0.0;
        self.frozen_rotation = 0.0;
        self.spring = None;
        self.last_tick_ms = None;
    }
}

/// Piecewise-linear interpolation over sorted `(input, output)` stops,
/// clamped at both ends.
fn ramp(input: f32, stops: &[(f32, f32)]) -> f32 {
    let Some(&(first_in, first_out)) = stops.first() else {
        return 0.0;
    };
    if input <= first_in {
        return first_out;
    }
    for pair in stops.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if input <= x1 {
            let span = x1 - x0;
            if span <= f32::EPSILON {
                return y1;
            }
            return y0 + (y1 - y0) * ((input - x0) / span);
        }
    }
    stops.last().map(|&(_, out)| out).unwrap_or(first_out)
}
