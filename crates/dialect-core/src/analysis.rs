//! Analysis parameters and uniform result types.
//!
//! Every backend adapter translates these into its own solver syntax and
//! parses its own output back into them, so callers never see
//! solver-specific data.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated frequency sweep range.
///
/// Construction fails on non-positive or inverted ranges, so a malformed
/// range can never reach a solver process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    start_hz: f64,
    stop_hz: f64,
    points_per_decade: usize,
}

impl FrequencyRange {
    pub fn new(start_hz: f64, stop_hz: f64, points_per_decade: usize) -> Result<Self> {
        if !(start_hz > 0.0) || !(stop_hz > start_hz) || points_per_decade == 0 {
            return Err(Error::InvalidFrequencyRange { start_hz, stop_hz });
        }
        Ok(Self {
            start_hz,
            stop_hz,
            points_per_decade,
        })
    }

    pub fn start_hz(&self) -> f64 {
        self.start_hz
    }

    pub fn stop_hz(&self) -> f64 {
        self.stop_hz
    }

    pub fn points_per_decade(&self) -> usize {
        self.points_per_decade
    }
}

/// Parameters for a single-frequency AC gain measurement.
///
/// The circuit is expected to carry a unit-magnitude AC source, so the
/// output magnitude is the gain.
#[derive(Debug, Clone, PartialEq)]
pub struct AcGainParams {
    pub freq_hz: f64,
    /// Net whose voltage magnitude/phase is measured.
    pub output_net: String,
}

/// Parameters for a multi-point AC sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct AcSweepParams {
    pub range: FrequencyRange,
    pub output_net: String,
}

/// Parameters for a noise sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseParams {
    pub range: FrequencyRange,
    pub output_net: String,
    /// Reference id of the input source the noise is referred to.
    pub input_source: String,
}

/// Result of a single-frequency AC gain measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainResult {
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

/// One point of an AC sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub freq_hz: f64,
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

/// An AC sweep: points with strictly increasing frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    points: Vec<SweepPoint>,
}

impl SweepResult {
    /// Build a sweep, enforcing strictly increasing frequency.
    pub fn from_points(points: Vec<SweepPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].freq_hz <= pair[0].freq_hz {
                return Err(Error::NonMonotonicSweep {
                    freq_hz: pair[1].freq_hz,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }
}

/// One point of a noise spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoisePoint {
    pub freq_hz: f64,
    /// Output-referred spectral density, V/sqrt(Hz).
    pub output_density: f64,
}

/// A noise sweep: spectral density per frequency plus the integrated total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseResult {
    pub points: Vec<NoisePoint>,
    /// Integrated total output noise, Vrms.
    pub total_output_noise: f64,
}

/// Any analysis outcome, for callers that handle results uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisResult {
    Gain(GainResult),
    Sweep(SweepResult),
    Noise(NoiseResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted() {
        assert!(matches!(
            FrequencyRange::new(1e6, 1e3, 10),
            Err(Error::InvalidFrequencyRange { .. })
        ));
    }

    #[test]
    fn test_range_rejects_nonpositive_start() {
        assert!(FrequencyRange::new(0.0, 1e3, 10).is_err());
        assert!(FrequencyRange::new(-1.0, 1e3, 10).is_err());
        assert!(FrequencyRange::new(f64::NAN, 1e3, 10).is_err());
    }

    #[test]
    fn test_range_accepts_valid() {
        let r = FrequencyRange::new(10.0, 1e6, 20).unwrap();
        assert_eq!(r.start_hz(), 10.0);
        assert_eq!(r.stop_hz(), 1e6);
        assert_eq!(r.points_per_decade(), 20);
    }

    #[test]
    fn test_sweep_rejects_unordered_points() {
        let points = vec![
            SweepPoint { freq_hz: 100.0, magnitude_db: 0.0, phase_deg: 0.0 },
            SweepPoint { freq_hz: 100.0, magnitude_db: -1.0, phase_deg: 0.0 },
        ];
        assert!(matches!(
            SweepResult::from_points(points),
            Err(Error::NonMonotonicSweep { .. })
        ));
    }

    #[test]
    fn test_result_serialization_tags() {
        let r = AnalysisResult::Gain(GainResult {
            magnitude_db: 20.0,
            phase_deg: -0.5,
        });
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"type\":\"gain\""));
    }
}
