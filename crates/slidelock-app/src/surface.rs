//! Reference rendering surface.
//!
//! Executes [`Action`]s against a model of the page: every animated value
//! remembers where it started, where it is going and how, so any instant
//! can be sampled. Completions come out in the order the animations
//! finish, carrying the ids the state machines handed out.
//!
//! Front-ends draw from a `Surface`; the simulation harness drives one with
//! a virtual clock. Neither has to re-implement animation timing.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Instant,
};

use slidelock_core::{
    Action, AnimationId, ExpansionPhase, Extent, FrameStyle, Motion, SharedElement, Trigger, View,
};
use tracing::trace;

/// Scale the destination content starts its reveal from.
pub const REVEAL_FROM_SCALE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    start: Instant,
    motion: Motion,
    id: Option<AnimationId>,
    reported: bool,
}

/// A scalar that may be moving towards a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated {
    from: f64,
    to: f64,
    run: Option<Run>,
}

impl Animated {
    /// Value at rest.
    pub fn new(value: f64) -> Self {
        Self { from: value, to: value, run: None }
    }

    /// Sampled value.
    pub fn value(&self, now: Instant) -> f64 {
        match self.run {
            None => self.to,
            Some(run) => {
                let t = run.motion.sample(now.saturating_duration_since(run.start));
                self.from + (self.to - self.from) * t
            },
        }
    }

    /// Resting value once the current animation ends.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Whether an animation is still moving at `now`.
    pub fn is_running(&self, now: Instant) -> bool {
        self.finishes_at().is_some_and(|end| now < end)
    }

    fn finishes_at(&self) -> Option<Instant> {
        self.run.map(|run| run.start + run.motion.duration())
    }

    fn set(&mut self, value: f64) {
        *self = Self::new(value);
    }

    /// Retarget from wherever the value is right now.
    fn animate(&mut self, to: f64, motion: Motion, now: Instant, id: Option<AnimationId>) {
        if let Some(old) = self.run.and_then(|r| r.id).filter(|_| self.is_running(now)) {
            trace!(?old, "animation superseded");
        }
        self.from = self.value(now);
        self.to = to;
        self.run = Some(Run { start: now, motion, id, reported: false });
    }

    fn pending_completion(&self) -> Option<(Instant, AnimationId)> {
        let run = self.run?;
        if run.reported {
            return None;
        }
        Some((self.finishes_at()?, run.id?))
    }

    fn mark_reported(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.reported = true;
        }
    }
}

/// Frame geometry resolved against a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Corner radius.
    pub border_radius: f64,
    /// Border thickness.
    pub border_width: f64,
    /// Border alpha.
    pub border_alpha: f64,
    /// Uniform scale.
    pub scale: f64,
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn resolve(extent: Extent, viewport: (f64, f64)) -> (f64, f64) {
    match extent {
        Extent::Fixed { width, height } => (width, height),
        Extent::Viewport => viewport,
    }
}

/// Model of everything the unlock sequence can change on screen.
#[derive(Debug, Clone)]
pub struct Surface {
    viewport: (f64, f64),
    handle: Animated,
    handle_pressed: bool,
    label_opacity: f64,
    frame_from: FrameStyle,
    frame_to: FrameStyle,
    frame: Animated,
    lock_screen_opacity: Animated,
    reveal: Animated,
    overlay_opacity: Animated,
    shared: BTreeMap<SharedElement, Animated>,
    views: BTreeSet<View>,
    phase: ExpansionPhase,
    unlocked: Option<Trigger>,
    content_scrollable: bool,
    site_ready: bool,
    suppressed_scrolls: u64,
    scroll_top: f64,
}

impl Surface {
    /// Surface for a viewport of `width` x `height` layout units.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: (width, height),
            handle: Animated::new(0.0),
            handle_pressed: false,
            label_opacity: 1.0,
            frame_from: FrameStyle::PHONE,
            frame_to: FrameStyle::PHONE,
            frame: Animated::new(1.0),
            lock_screen_opacity: Animated::new(1.0),
            reveal: Animated::new(0.0),
            overlay_opacity: Animated::new(1.0),
            shared: BTreeMap::new(),
            views: BTreeSet::new(),
            phase: ExpansionPhase::Initial,
            unlocked: None,
            content_scrollable: false,
            site_ready: false,
            suppressed_scrolls: 0,
            scroll_top: 0.0,
        }
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    /// Viewport size.
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Execute one action at `now`.
    pub fn apply(&mut self, action: &Action, now: Instant) {
        match action {
            Action::PreventDefaultScroll => self.suppressed_scrolls += 1,
            Action::SetHandle { x } => self.handle.set(*x),
            Action::AnimateHandle { id, to, motion } => {
                self.handle.animate(*to, *motion, now, Some(*id));
            },
            Action::HandlePressed(pressed) => self.handle_pressed = *pressed,
            Action::SetLabelOpacity(opacity) => self.label_opacity = *opacity,
            Action::Unlocked { trigger } => self.unlocked = Some(*trigger),
            Action::PhaseEntered(phase) => self.phase = *phase,
            Action::AnimateFrame { id, style, transition } => {
                // A new frame animation starts from the previous target.
                self.frame_from = self.frame_to;
                self.frame_to = *style;
                self.frame = Animated::new(0.0);
                self.frame.animate(1.0, Motion::Tween(*transition), now, Some(*id));
            },
            Action::FadeOutLockScreen { id, transition } => {
                self.lock_screen_opacity.animate(0.0, Motion::Tween(*transition), now, Some(*id));
            },
            Action::RevealDestination { transition } => {
                self.reveal.animate(1.0, Motion::Tween(*transition), now, None);
            },
            Action::MountView(view) => {
                self.views.insert(*view);
            },
            Action::UnmountView(view) => {
                self.views.remove(view);
            },
            Action::Interpolate { element, transition } => {
                let mut progress = Animated::new(0.0);
                progress.animate(1.0, Motion::Tween(*transition), now, None);
                self.shared.insert(*element, progress);
            },
            Action::ContentScrollable(scrollable) => self.content_scrollable = *scrollable,
            Action::DismissOverlay { transition } => {
                self.overlay_opacity.animate(0.0, Motion::Tween(*transition), now, None);
            },
            Action::SiteReady(ready) => self.site_ready = *ready,
        }
    }

    /// Execute a batch of actions in order.
    pub fn apply_all<'a>(&mut self, actions: impl IntoIterator<Item = &'a Action>, now: Instant) {
        for action in actions {
            self.apply(action, now);
        }
    }

    fn tracked_mut(&mut self) -> [&mut Animated; 3] {
        [&mut self.handle, &mut self.frame, &mut self.lock_screen_opacity]
    }

    fn tracked(&self) -> [&Animated; 3] {
        [&self.handle, &self.frame, &self.lock_screen_opacity]
    }

    /// Earliest instant at which an unreported animation completes.
    pub fn next_completion(&self) -> Option<Instant> {
        self.tracked().into_iter().filter_map(Animated::pending_completion).map(|(at, _)| at).min()
    }

    /// Completions due by `now`, in the order the animations finished.
    pub fn take_completions(&mut self, now: Instant) -> Vec<AnimationId> {
        let mut due = Vec::new();
        for animated in self.tracked_mut() {
            if let Some((at, id)) = animated.pending_completion() {
                if at <= now {
                    animated.mark_reported();
                    due.push((at, id));
                }
            }
        }
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether anything on screen is still moving.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.tracked().into_iter().any(|a| a.is_running(now))
            || self.reveal.is_running(now)
            || self.overlay_opacity.is_running(now)
            || self.shared.values().any(|a| a.is_running(now))
    }

    /// Handle offset.
    pub fn handle_x(&self, now: Instant) -> f64 {
        self.handle.value(now)
    }

    /// Whether the handle shows pressed feedback.
    pub fn handle_pressed(&self) -> bool {
        self.handle_pressed
    }

    /// Slide label opacity.
    pub fn label_opacity(&self) -> f64 {
        self.label_opacity
    }

    /// Phone frame geometry.
    pub fn frame(&self, now: Instant) -> FrameSample {
        let t = self.frame.value(now);
        let (fw, fh) = resolve(self.frame_from.extent, self.viewport);
        let (tw, th) = resolve(self.frame_to.extent, self.viewport);
        let (a, b) = (&self.frame_from, &self.frame_to);
        FrameSample {
            width: lerp(fw, tw, t),
            height: lerp(fh, th, t),
            border_radius: lerp(a.border_radius, b.border_radius, t),
            border_width: lerp(a.border_width, b.border_width, t),
            border_alpha: lerp(a.border_alpha, b.border_alpha, t),
            scale: lerp(a.scale, b.scale, t),
        }
    }

    /// Lock-screen content opacity.
    pub fn lock_screen_opacity(&self, now: Instant) -> f64 {
        self.lock_screen_opacity.value(now)
    }

    /// Destination content opacity and scale.
    pub fn reveal(&self, now: Instant) -> (f64, f64) {
        let t = self.reveal.value(now);
        (t, lerp(REVEAL_FROM_SCALE, 1.0, t))
    }

    /// Background overlay opacity.
    pub fn overlay_opacity(&self, now: Instant) -> f64 {
        self.overlay_opacity.value(now)
    }

    /// Progress of a shared element's layout interpolation, if one ran.
    pub fn interpolation(&self, element: SharedElement, now: Instant) -> Option<f64> {
        self.shared.get(&element).map(|a| a.value(now))
    }

    /// Whether `view` is mounted.
    pub fn is_mounted(&self, view: View) -> bool {
        self.views.contains(&view)
    }

    /// Last phase reported.
    pub fn phase(&self) -> ExpansionPhase {
        self.phase
    }

    /// Trigger of the unlock, once it happened.
    pub fn unlocked(&self) -> Option<Trigger> {
        self.unlocked
    }

    /// Whether content may scroll.
    pub fn content_scrollable(&self) -> bool {
        self.content_scrollable
    }

    /// Whether the site-ready marker is raised.
    pub fn site_ready(&self) -> bool {
        self.site_ready
    }

    /// Wheel events whose default scroll was suppressed.
    pub fn suppressed_scrolls(&self) -> u64 {
        self.suppressed_scrolls
    }

    /// Content scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Scroll content to `offset`, clamped to `[0, max]`.
    ///
    /// Returns the new offset, or `None` while content is scroll-locked.
    pub fn scroll_to(&mut self, offset: f64, max: f64) -> Option<f64> {
        if !self.content_scrollable {
            return None;
        }
        self.scroll_top = offset.clamp(0.0, max.max(0.0));
        Some(self.scroll_top)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use slidelock_core::{AnimationChannel, Curve, Transition};

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn id(channel: AnimationChannel, seq: u64) -> AnimationId {
        AnimationId { channel, seq }
    }

    #[test]
    fn completions_arrive_in_finish_order() {
        let t0 = Instant::now();
        let mut surface = Surface::new(1280.0, 800.0);
        let frame = id(AnimationChannel::Frame, 2);
        let fade = id(AnimationChannel::LockScreen, 3);

        surface.apply(
            &Action::AnimateFrame {
                id: frame,
                style: FrameStyle::FULLSCREEN,
                transition: Transition::millis(250, Curve::EaseInOut),
            },
            t0,
        );
        surface.apply(
            &Action::FadeOutLockScreen {
                id: fade,
                transition: Transition::millis(200, Curve::EaseOut),
            },
            t0,
        );

        assert_eq!(surface.next_completion(), Some(t0 + ms(200)));
        assert!(surface.take_completions(t0 + ms(199)).is_empty());
        assert_eq!(surface.take_completions(t0 + ms(300)), vec![fade, frame]);
        assert!(surface.take_completions(t0 + ms(400)).is_empty());
        assert_eq!(surface.next_completion(), None);
    }

    #[test]
    fn frame_interpolates_to_viewport() {
        let t0 = Instant::now();
        let mut surface = Surface::new(1000.0, 1000.0);
        surface.apply(
            &Action::AnimateFrame {
                id: id(AnimationChannel::Frame, 1),
                style: FrameStyle::FULLSCREEN,
                transition: Transition::millis(100, Curve::Linear),
            },
            t0,
        );

        let start = surface.frame(t0);
        assert_eq!(start.width, 375.0);
        assert_eq!(start.border_radius, 60.0);

        let mid = surface.frame(t0 + ms(50));
        assert!((mid.width - 687.5).abs() < 1e-6);

        let end = surface.frame(t0 + ms(100));
        assert_eq!(end.width, 1000.0);
        assert_eq!(end.border_width, 0.0);
    }

    #[test]
    fn superseded_handle_animation_never_completes() {
        let t0 = Instant::now();
        let mut surface = Surface::new(400.0, 800.0);
        let back = id(AnimationChannel::Handle, 1);
        let commit = id(AnimationChannel::Handle, 2);

        surface.apply(
            &Action::AnimateHandle {
                id: back,
                to: 0.0,
                motion: Motion::Tween(Transition::millis(300, Curve::Linear)),
            },
            t0,
        );
        surface.apply(
            &Action::AnimateHandle { id: commit, to: 200.0, motion: Motion::timed_spring(300) },
            t0 + ms(100),
        );

        assert_eq!(surface.take_completions(t0 + ms(1_000)), vec![commit]);
        assert_eq!(surface.handle_x(t0 + ms(1_000)), 200.0);
    }

    #[test]
    fn reveal_scales_from_ninety_percent() {
        let t0 = Instant::now();
        let mut surface = Surface::new(400.0, 800.0);
        let transition = Transition::millis(400, Curve::EaseOut).with_delay(ms(100));
        surface.apply(&Action::RevealDestination { transition }, t0);

        assert_eq!(surface.reveal(t0 + ms(50)), (0.0, REVEAL_FROM_SCALE));
        assert_eq!(surface.reveal(t0 + ms(500)), (1.0, 1.0));
        assert!(surface.is_animating(t0 + ms(300)));
        assert!(!surface.is_animating(t0 + ms(500)));
    }

    #[test]
    fn scroll_is_refused_while_locked() {
        let t0 = Instant::now();
        let mut surface = Surface::new(400.0, 800.0);
        assert_eq!(surface.scroll_to(100.0, 1_000.0), None);
        surface.apply(&Action::ContentScrollable(true), t0);
        assert_eq!(surface.scroll_to(2_000.0, 1_000.0), Some(1_000.0));
        assert_eq!(surface.scroll_to(-5.0, 1_000.0), Some(0.0));
    }
}
