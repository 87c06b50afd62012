//! Tunable constants for the ray-cast view.
//!
//! Every value has a default matching the stock look; a JSON file may
//! override any subset of them:
//!
//! ```json
//! { "plane_len": 0.8, "moving_stride": 3 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /* projection ------------------------------------------------------*/
    /// Camera-plane length; sets the field of view.
    pub plane_len: f32,
    /// Floor/ceiling `rowDistance = flatness * h / p`; controls apparent tile size.
    pub flatness: f32,
    /// Horizon shift as a fraction of the output height (positive = down).
    pub horizon_bias: f32,

    /* safety clamp ----------------------------------------------------*/
    /// Keep the raw pose this far inside the map (grid units).
    pub edge_margin: f32,
    /// Inner band the in-tile fraction is clamped to.
    pub band_min: f32,
    pub band_max: f32,

    /* ray casting -----------------------------------------------------*/
    pub min_distance: f32,
    /// Distance reported for rays that leave the grid.
    pub max_distance: f32,

    /* compositing -----------------------------------------------------*/
    /// Brightness of faces hit on a Y step.
    pub side_shade: f32,
    /// Walls are fully lit up to here …
    pub fog_start: f32,
    /// … and fully black from here on.
    pub fog_end: f32,
    /// Door frame width, as a fraction of the tile face.
    pub door_frame: f32,
    /// Lintel height, as a fraction of the door strip.
    pub door_lintel: f32,
    /// Baseboard height, as a fraction of the wall strip.
    pub baseboard: f32,
    pub baseboard_min_px: u32,
    /// Texels kept clear of source edges when sampling.
    pub texel_inset: f32,
    /// Seeded ceiling beams, boulder fascia and wall decorations.
    pub atmosphere: bool,

    /* adaptive quality ------------------------------------------------*/
    /// Fraction off a tile centre that counts as "moving".
    pub motion_threshold: f32,
    pub moving_stride: u32,
    pub stationary_stride: u32,

    /* dirty cache -----------------------------------------------------*/
    pub cache_epsilon: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            plane_len: 0.66,
            flatness: 0.5,
            horizon_bias: 0.0,

            edge_margin: 0.1,
            band_min: 0.15,
            band_max: 0.85,

            min_distance: 0.05,
            max_distance: 100.0,

            side_shade: 0.7,
            fog_start: 2.0,
            fog_end: 12.0,
            door_frame: 0.12,
            door_lintel: 0.08,
            baseboard: 0.06,
            baseboard_min_px: 3,
            texel_inset: 0.5,
            atmosphere: true,

            motion_threshold: 0.02,
            moving_stride: 4,
            stationary_stride: 1,

            cache_epsilon: 0.001,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason })
            }
        }

        check(self.plane_len > 0.0, "plane_len", "must be positive")?;
        check(self.flatness > 0.0, "flatness", "must be positive")?;
        check(
            self.horizon_bias.abs() < 0.5,
            "horizon_bias",
            "must stay within half the screen",
        )?;
        check(
            (0.0..0.5).contains(&self.edge_margin),
            "edge_margin",
            "must be in [0, 0.5)",
        )?;
        check(
            0.0 <= self.band_min && self.band_min < self.band_max && self.band_max <= 1.0,
            "band_min",
            "band must satisfy 0 <= min < max <= 1",
        )?;
        check(
            0.0 < self.min_distance && self.min_distance < self.max_distance,
            "min_distance",
            "must be positive and below max_distance",
        )?;
        check(
            self.max_distance.is_finite(),
            "max_distance",
            "must be finite",
        )?;
        check(
            (0.0..=1.0).contains(&self.side_shade),
            "side_shade",
            "must be in [0, 1]",
        )?;
        check(self.fog_start < self.fog_end, "fog_start", "must be below fog_end")?;
        check(
            (0.0..0.5).contains(&self.door_frame),
            "door_frame",
            "must be in [0, 0.5)",
        )?;
        check(
            (0.0..1.0).contains(&self.door_lintel),
            "door_lintel",
            "must be in [0, 1)",
        )?;
        check(
            (0.0..1.0).contains(&self.baseboard),
            "baseboard",
            "must be in [0, 1)",
        )?;
        check(self.texel_inset >= 0.0, "texel_inset", "must not be negative")?;
        check(
            self.motion_threshold >= 0.0,
            "motion_threshold",
            "must not be negative",
        )?;
        check(self.moving_stride >= 1, "moving_stride", "must be at least 1")?;
        check(
            self.stationary_stride >= 1,
            "stationary_stride",
            "must be at least 1",
        )?;
        check(self.cache_epsilon >= 0.0, "cache_epsilon", "must not be negative")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RenderConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RenderConfig::from_json_str(r#"{ "plane_len": 0.8, "moving_stride": 3 }"#)
            .unwrap();
        assert_eq!(cfg.plane_len, 0.8);
        assert_eq!(cfg.moving_stride, 3);
        assert_eq!(cfg.stationary_stride, RenderConfig::default().stationary_stride);
    }

    #[test]
    fn rejects_zero_stride() {
        let err = RenderConfig::from_json_str(r#"{ "moving_stride": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "moving_stride",
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_band() {
        let cfg = RenderConfig {
            band_min: 0.9,
            band_max: 0.1,
            ..RenderConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn reports_bad_json_and_missing_file() {
        assert!(matches!(
            RenderConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_file("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn json_round_trip_of_defaults() {
        let text = serde_json::to_string(&RenderConfig::default()).unwrap();
        assert_eq!(
            RenderConfig::from_json_str(&text).unwrap(),
            RenderConfig::default()
        );
    }
}
