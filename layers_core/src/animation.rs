// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition animation contract.
//!
//! A transition assigns each participating entry an [`AnimationRole`] and
//! asks for an [`Animation`] handle for it, first from the unit itself and
//! then by resolving the transition's [`AnimationRes`] through the host.
//! The stack ticks handles from [`Layers::advance`](crate::stack::Layers::advance)
//! and finishes the transition once every handle reports
//! [`AnimationStatus::Finished`].
//!
//! [`SlideFade`] is a ready-made handle that interpolates a translation and
//! an opacity and pushes the result through [`Host::apply_presentation`].

use core::fmt;

use kurbo::{Affine, Size, Vec2};

use crate::host::{Host, ViewId};
use crate::time::{Duration, HostTime};

/// The part an entry plays in a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimationRole {
    /// An entry that stays visible underneath a newly added top.
    LowerOut,
    /// The entry being added.
    UpperIn,
    /// The entry being removed from the top.
    UpperOut,
    /// An entry revealed by a removal.
    LowerIn,
}

impl AnimationRole {
    /// All roles, in slot order.
    pub const ALL: [Self; 4] = [Self::LowerOut, Self::UpperIn, Self::UpperOut, Self::LowerIn];

    /// Slot index of this role in an [`AnimationSet`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LowerOut => 0,
            Self::UpperIn => 1,
            Self::UpperOut => 2,
            Self::LowerIn => 3,
        }
    }
}

/// Host-defined animation resource id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationRes(pub u32);

impl fmt::Debug for AnimationRes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationRes({})", self.0)
    }
}

/// One optional animation resource per [`AnimationRole`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationSet([Option<AnimationRes>; 4]);

impl AnimationSet {
    /// An empty set.
    pub const EMPTY: Self = Self([None; 4]);

    /// The resource for `role`.
    #[inline]
    #[must_use]
    pub fn get(&self, role: AnimationRole) -> Option<AnimationRes> {
        self.0[role.index()]
    }

    /// Sets the resource for `role`.
    #[inline]
    pub fn set(&mut self, role: AnimationRole, res: Option<AnimationRes>) {
        self.0[role.index()] = res;
    }

    /// Returns `true` if no role has a resource.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// Progress reported by [`Animation::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStatus {
    /// More frames to come.
    Running,
    /// The animation reached its end state.
    Finished,
}

/// A running animation on one view.
pub trait Animation {
    /// Called once when the transition starts the handle.
    fn start(&mut self, host: &mut dyn Host, now: Option<HostTime>) {
        _ = (host, now);
    }

    /// Moves the animation to `now`.
    fn advance(&mut self, host: &mut dyn Host, now: HostTime) -> AnimationStatus;

    /// Stops early. The view should be left in a state the next layout can
    /// build on.
    fn cancel(&mut self, host: &mut dyn Host);
}

impl fmt::Debug for dyn Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation").finish_non_exhaustive()
    }
}

/// Transform and opacity applied to a view while it animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    /// View transform relative to its laid-out position.
    pub transform: Affine,
    /// Opacity multiplier in `0.0..=1.0`.
    pub opacity: f32,
}

impl Presentation {
    /// No transform, fully opaque.
    pub const IDENTITY: Self = Self {
        transform: Affine::IDENTITY,
        opacity: 1.0,
    };
}

impl Default for Presentation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Progress curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end (smoothstep).
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `0.0..=1.0` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

// ---------------------------------------------------------------------------
// SlideFade
// ---------------------------------------------------------------------------

/// Interpolates a translation and an opacity on one view.
///
/// The clock starts on the first [`advance`](Animation::advance) unless a
/// start time is supplied to [`start`](Animation::start).
#[derive(Clone, Debug)]
pub struct SlideFade {
    view: ViewId,
    offset: (Vec2, Vec2),
    opacity: (f32, f32),
    duration: Duration,
    easing: Easing,
    started: Option<HostTime>,
}

impl SlideFade {
    /// A handle on `view` that does nothing visible for `duration`.
    #[must_use]
    pub fn new(view: ViewId, duration: Duration) -> Self {
        Self {
            view,
            offset: (Vec2::ZERO, Vec2::ZERO),
            opacity: (1.0, 1.0),
            duration,
            easing: Easing::default(),
            started: None,
        }
    }

    /// The stock motion for `role` across a container of size `extent`.
    ///
    /// Incoming tops slide in from the trailing edge and fade in, outgoing
    /// tops do the reverse; entries underneath shift by a third of the width.
    #[must_use]
    pub fn for_role(view: ViewId, role: AnimationRole, extent: Size, duration: Duration) -> Self {
        let full = Vec2::new(extent.width, 0.0);
        let partial = Vec2::new(-extent.width / 3.0, 0.0);
        let anim = Self::new(view, duration);
        match role {
            AnimationRole::UpperIn => anim.with_offset(full, Vec2::ZERO).with_opacity(0.0, 1.0),
            AnimationRole::UpperOut => anim.with_offset(Vec2::ZERO, full).with_opacity(1.0, 0.0),
            AnimationRole::LowerOut => anim.with_offset(Vec2::ZERO, partial),
            AnimationRole::LowerIn => anim.with_offset(partial, Vec2::ZERO),
        }
    }

    /// Sets the start and end translation.
    #[must_use]
    pub fn with_offset(mut self, from: Vec2, to: Vec2) -> Self {
        self.offset = (from, to);
        self
    }

    /// Sets the start and end opacity.
    #[must_use]
    pub fn with_opacity(mut self, from: f32, to: f32) -> Self {
        self.opacity = (from, to);
        self
    }

    /// Sets the progress curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The view being animated.
    #[must_use]
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// The presentation at linear progress `t` in `0.0..=1.0`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Presentation {
        let eased = self.easing.apply(t);
        let (from, to) = self.offset;
        let offset = from.lerp(to, eased);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "opacity is stored as f32; the eased factor is within 0..=1"
        )]
        let opacity = self.opacity.0 + (self.opacity.1 - self.opacity.0) * eased as f32;
        Presentation {
            transform: Affine::translate(offset),
            opacity,
        }
    }
}

impl Animation for SlideFade {
    fn start(&mut self, host: &mut dyn Host, now: Option<HostTime>) {
        self.started = now;
        host.apply_presentation(self.view, &self.sample(0.0));
    }

    fn advance(&mut self, host: &mut dyn Host, now: HostTime) -> AnimationStatus {
        let started = *self.started.get_or_insert(now);
        let t = self.duration.fraction(now.saturating_duration_since(started));
        host.apply_presentation(self.view, &self.sample(t));
        if t >= 1.0 {
            AnimationStatus::Finished
        } else {
            AnimationStatus::Running
        }
    }

    fn cancel(&mut self, host: &mut dyn Host) {
        host.apply_presentation(self.view, &Presentation::IDENTITY);
    }
}
