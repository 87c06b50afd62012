//! Adaptive sampling: coarse columns/rows while the camera is between
//! tiles, full detail once it has settled.

use glam::Vec2;

use crate::config::RenderConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Moving,
    Stationary,
}

impl MotionState {
    /// Classify from the drawn position alone (grid units, tile centres on
    /// integers). No history is kept.
    pub fn classify(pos: Vec2, threshold: f32) -> Self {
        let off = (pos - pos.round()).abs();
        if off.x > threshold || off.y > threshold {
            MotionState::Moving
        } else {
            MotionState::Stationary
        }
    }
}

/// Stride selection for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quality {
    pub motion: MotionState,
    /// Columns per ray and pixels per floor/ceiling sample.
    pub stride: usize,
}

impl Quality {
    pub fn for_position(pos: Vec2, cfg: &RenderConfig) -> Self {
        let motion = MotionState::classify(pos, cfg.motion_threshold);
        let stride = match motion {
            MotionState::Moving => cfg.moving_stride,
            MotionState::Stationary => cfg.stationary_stride,
        };
        Self {
            motion,
            stride: stride.max(1) as usize,
        }
    }
}
