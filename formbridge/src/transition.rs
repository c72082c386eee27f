//! Error-message fade transitions.
//!
//! Messages appear and disappear through timed transitions that never block
//! evaluation. A transition is plain data advanced by [`FormEngine::tick`];
//! its completion is applied only if no later evaluation superseded it.
//!
//! [`FormEngine::tick`]: crate::engine::FormEngine::tick

use std::time::{Duration, Instant};

use serde::Deserialize;

/// Configuration for a single transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

/// Easing function for transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply easing to progress (0.0 to 1.0).
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Direction of a message transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

/// An in-flight fade, stamped with the evaluation that scheduled it.
#[derive(Debug, Clone)]
pub struct MessageTransition {
    pub fade: Fade,
    pub start: Instant,
    pub config: TransitionConfig,
    /// Evaluation sequence number that scheduled this transition.
    pub seq: u64,
}

impl MessageTransition {
    pub fn new(fade: Fade, config: TransitionConfig, seq: u64) -> Self {
        Self {
            fade,
            start: Instant::now(),
            config,
            seq,
        }
    }

    /// Linear progress in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.config.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.config.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.config.duration
    }

    /// Eased opacity of the message at `now`.
    pub fn opacity(&self, now: Instant) -> f32 {
        let eased = self.config.easing.apply(self.progress(now));
        match self.fade {
            Fade::In => eased,
            Fade::Out => 1.0 - eased,
        }
    }
}

/// A field's visible error message.
#[derive(Debug, Clone)]
pub struct ErrorMessage {
    pub text: String,
    pub transition: Option<MessageTransition>,
}

impl ErrorMessage {
    /// A message that starts fading in.
    pub fn fading_in(text: impl Into<String>, config: TransitionConfig, seq: u64) -> Self {
        Self {
            text: text.into(),
            transition: Some(MessageTransition::new(Fade::In, config, seq)),
        }
    }

    /// Start (or restart) the removal fade, superseding any pending one.
    pub fn fade_out(&mut self, config: TransitionConfig, seq: u64) {
        self.transition = Some(MessageTransition::new(Fade::Out, config, seq));
    }

    /// True while the message is on its way out.
    pub fn is_leaving(&self) -> bool {
        matches!(
            self.transition,
            Some(MessageTransition {
                fade: Fade::Out,
                ..
            })
        )
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.transition
            .as_ref()
            .map(|t| t.opacity(now))
            .unwrap_or(1.0)
    }
}

/// What happened to a message when its transition was advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Still animating, or not animating at all.
    Pending,
    /// Fade-in finished; the message is fully shown.
    Shown,
    /// Fade-out finished; the message node should be dropped.
    Removed,
}

/// Advance a message's transition.
///
/// `latest_seq` is the sequence number of the most recent evaluation of the
/// owning field. A completed fade-out scheduled before that evaluation is
/// stale and does not remove anything.
pub fn settle(message: &mut ErrorMessage, now: Instant, latest_seq: u64) -> Settled {
    let Some(transition) = &message.transition else {
        return Settled::Pending;
    };
    if !transition.is_complete(now) {
        return Settled::Pending;
    }
    match transition.fade {
        Fade::In => {
            message.transition = None;
            Settled::Shown
        }
        Fade::Out if transition.seq >= latest_seq => Settled::Removed,
        Fade::Out => {
            message.transition = None;
            Settled::Pending
        }
    }
}
