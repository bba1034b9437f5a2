//! Picking run parameters for animated playback of a standing wave.
//!
//! Rendering itself is left to the consumer;
//! this only chooses a resolution, step count and store interval
//! so that a given number of periods is covered by roughly a given number of frames.

use std::num::NonZeroUsize;

use crate::{RunParams, StoreMode};

/// Run parameters and store mode for producing animation frames.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackPlan {
    /// Parameters to pass to [`Wave2D::solve`][crate::Wave2D::solve].
    pub params: RunParams,
    /// Snapshot interval to pass alongside `params`.
    pub store: StoreMode,
}

impl PlaybackPlan {
    /// Plan a run showing `periods` oscillations of the `(mx, my)` mode
    /// in about `target_frames` frames.
    ///
    /// The grid has at least 8 nodes per mode and never fewer than 32 intervals,
    /// and the Courant number is fixed at 0.5.
    pub fn for_modes(
        mx: u32,
        my: u32,
        wave_speed: f64,
        periods: f64,
        target_frames: usize,
    ) -> Self {
        let highest_mode = mx.max(my) as usize;
        let mode_radius = ((mx * mx + my * my) as f64).sqrt();

        let resolution = usize::max(32, 8 * highest_mode);
        let cfl = 0.5;
        let steps_per_period = if mode_radius > 0.0 {
            usize::max(1, (4.0 * resolution as f64 / mode_radius).round() as usize)
        } else {
            1
        };
        let steps = usize::max(
            steps_per_period,
            (periods * steps_per_period as f64).round() as usize,
        );
        let interval = (steps as f64 / target_frames.max(1) as f64).round() as usize;

        Self {
            params: RunParams {
                resolution,
                steps,
                cfl,
                wave_speed,
                mx,
                my,
            },
            store: StoreMode::Snapshots(NonZeroUsize::new(interval).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Number of frames the planned run will store, including step 0.
    pub fn frame_count(&self) -> usize {
        match self.store {
            StoreMode::Snapshots(interval) => self.params.steps / interval.get() + 1,
            StoreMode::ErrorHistory => 0,
        }
    }
}
