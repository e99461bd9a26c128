//! The periodic grow / linger / fade timeline.
//!
//! This is the CPU mirror of the phase selection in
//! [`BEAM_FRAGMENT_BODY`](crate::shaders::BEAM_FRAGMENT_BODY); the two must
//! stay in lockstep.

use crate::types::BeamTimings;

/// Impact pulse amplitude during the linger phase.
const LINGER_PULSE_AMPLITUDE: f32 = 0.2;

/// Impact pulse angular frequency over the normalized linger phase.
const LINGER_PULSE_FREQUENCY: f32 = 30.0;

/// One of the three time-ordered segments of a beam's cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The beam extends from origin to target.
    Grow,
    /// Full length, pulsing impact.
    Linger,
    /// Full length, fading out.
    Fade,
}

/// Animation values for one point in time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseState {
    /// Active phase.
    pub phase: Phase,
    /// Time within the current cycle, in `[0, period)`.
    pub local_time: f32,
    /// How far along origin → target the beam currently reaches.
    pub current_length: f32,
    /// Beam opacity multiplier.
    pub fade: f32,
    /// Root glow multiplier.
    pub root_intensity: f32,
    /// Impact glow multiplier.
    pub impact_intensity: f32,
    /// Normalized progress through the fade phase; `0` outside it.
    pub fade_progress: f32,
}

impl BeamTimings {
    /// Length of one full grow + linger + fade cycle.
    #[must_use]
    pub fn period(&self) -> f32 {
        self.grow + self.linger + self.fade
    }

    /// Wrap an elapsed time into the current cycle.
    #[must_use]
    pub fn local_time(&self, time: f32) -> f32 {
        time.rem_euclid(self.period())
    }

    /// Evaluate the timeline at `time` for a beam of `target_length`.
    #[must_use]
    pub fn sample(&self, time: f32, target_length: f32) -> PhaseState {
        let local_time = self.local_time(time);

        if local_time < self.grow {
            PhaseState {
                phase: Phase::Grow,
                local_time,
                current_length: target_length * (local_time / self.grow),
                fade: 1.0,
                root_intensity: 1.0,
                impact_intensity: 0.0,
                fade_progress: 0.0,
            }
        } else if local_time < self.grow + self.linger {
            let linger_progress = (local_time - self.grow) / self.linger;
            PhaseState {
                phase: Phase::Linger,
                local_time,
                current_length: target_length,
                fade: 1.0,
                root_intensity: 1.0,
                impact_intensity: 1.0
                    + LINGER_PULSE_AMPLITUDE * (linger_progress * LINGER_PULSE_FREQUENCY).sin(),
                fade_progress: 0.0,
            }
        } else {
            let fade_progress = (local_time - self.grow - self.linger) / self.fade;
            let fade = 1.0 - fade_progress;
            PhaseState {
                phase: Phase::Fade,
                local_time,
                current_length: target_length,
                fade,
                root_intensity: fade,
                impact_intensity: fade * 0.5,
                fade_progress,
            }
        }
    }
}
