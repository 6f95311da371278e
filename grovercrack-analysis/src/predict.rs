//! Closed-form cost model for classical enumeration vs. simulated search.
//!
//! Both time models are anchored at a measured calibration point of length
//! [`CALIBRATION_LENGTH`]:
//!
//! - classical time grows as `a^L` (O(N) over `N = a^L` candidates),
//! - simulated time grows as `sqrt(a^L)` plus a fixed per-character cost.
//!
//! Space uses a different base for the simulated side: a register of
//! `q = code_width(a)` bits per character holds `2^(q·L)` amplitudes, which is
//! not the same growth as `a^L`.

use grovercrack_core::code_width;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length the calibration times were measured at.
pub const CALIBRATION_LENGTH: u32 = 2;

/// Longest length [`ComplexityPredictor::find_crossover`] scans by default.
pub const DEFAULT_CROSSOVER_SCAN: u32 = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Measured constants the model extrapolates from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Classical time at the calibration length, ms.
    pub classical_base_time: f64,
    /// Simulated time at the calibration length, ms.
    pub simulated_base_time: f64,
    /// Simulated cost per character, ms.
    pub simulated_overhead: f64,
    pub alphabet_size: u32,
    /// Classical control overhead per character in the simulated space model.
    pub space_overhead: u32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            classical_base_time: 0.45,
            simulated_base_time: 69.84,
            simulated_overhead: 10.0,
            alphabet_size: 94,
            space_overhead: 32,
        }
    }
}

impl Calibration {
    /// Default constants for a different alphabet size.
    pub fn for_alphabet(alphabet_size: u32) -> Self {
        Self { alphabet_size, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), PredictError> {
        if self.alphabet_size == 0 {
            return Err(PredictError::InvalidCalibration("alphabet_size must be at least 1".into()));
        }
        for (name, v) in [
            ("classical_base_time", self.classical_base_time),
            ("simulated_base_time", self.simulated_base_time),
            ("simulated_overhead", self.simulated_overhead),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PredictError::InvalidCalibration(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

/// Space figure in byte-equivalent units, or overflow past `u128`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SpaceUnits {
    Units(u128),
    Overflow,
}

impl SpaceUnits {
    fn from_checked(v: Option<u128>) -> Self {
        v.map_or(SpaceUnits::Overflow, SpaceUnits::Units)
    }

    pub fn units(&self) -> Option<u128> {
        match self {
            SpaceUnits::Units(v) => Some(*v),
            SpaceUnits::Overflow => None,
        }
    }

    /// Lossy float view for plotting; overflow maps to infinity.
    pub fn as_f64(&self) -> f64 {
        match self {
            SpaceUnits::Units(v) => *v as f64,
            SpaceUnits::Overflow => f64::INFINITY,
        }
    }
}

impl fmt::Display for SpaceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceUnits::Units(v) => write!(f, "{v}"),
            SpaceUnits::Overflow => f.write_str("overflow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplexityPrediction {
    pub length: u32,
    /// ms; `inf` once it leaves `f64` range.
    pub classical_time: f64,
    /// ms
    pub simulated_time: f64,
    pub classical_space: SpaceUnits,
    pub simulated_space: SpaceUnits,
}

impl ComplexityPrediction {
    /// Classical over simulated time.
    pub fn speedup(&self) -> f64 {
        self.classical_time / self.simulated_time
    }

    /// Simulated over classical space; `None` if either overflowed.
    pub fn space_ratio(&self) -> Option<f64> {
        let c = self.classical_space.units()?;
        let s = self.simulated_space.units()?;
        Some(s as f64 / c as f64)
    }
}

/// First length at which simulated time beats classical time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Crossover {
    pub length: u32,
    pub simulated_time: f64,
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ComplexityPredictor {
    calibration: Calibration,
    scaling_factor: f64,
    qubits_per_char: u32,
}

impl ComplexityPredictor {
    pub fn new(calibration: Calibration) -> Result<Self, PredictError> {
        calibration.validate()?;
        Ok(Self::from_validated(calibration))
    }

    fn from_validated(calibration: Calibration) -> Self {
        let a = calibration.alphabet_size as f64;
        // Strip the per-character overhead out of the calibration measurement
        // and normalize by sqrt(a^2).
        let scaling_factor = ((calibration.simulated_base_time
            - calibration.simulated_overhead * CALIBRATION_LENGTH as f64)
            / a.powi(CALIBRATION_LENGTH as i32).sqrt())
        .max(0.0);
        Self {
            qubits_per_char: code_width(calibration.alphabet_size as usize),
            calibration,
            scaling_factor,
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Coefficient on `sqrt(a^L)` in the simulated time model.
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn qubits_per_char(&self) -> u32 {
        self.qubits_per_char
    }

    fn alphabet_pow(&self, length: u32) -> f64 {
        (self.calibration.alphabet_size as f64).powi(length.min(i32::MAX as u32) as i32)
    }

    /// `base / a^2 * a^L`
    pub fn predict_classical_time(&self, length: u32) -> f64 {
        if self.calibration.classical_base_time == 0.0 {
            // 0 * inf would turn long lengths into NaN.
            return 0.0;
        }
        self.calibration.classical_base_time / self.alphabet_pow(CALIBRATION_LENGTH)
            * self.alphabet_pow(length)
    }

    /// `s * sqrt(a^L) + overhead * L`
    pub fn predict_simulated_time(&self, length: u32) -> f64 {
        let overhead = self.calibration.simulated_overhead * length as f64;
        if self.scaling_factor == 0.0 {
            // 0 * inf would turn long lengths into NaN.
            return overhead;
        }
        self.scaling_factor * self.alphabet_pow(length).sqrt() + overhead
    }

    /// `L * a^L`
    pub fn predict_classical_space(&self, length: u32) -> SpaceUnits {
        SpaceUnits::from_checked(
            (self.calibration.alphabet_size as u128)
                .checked_pow(length)
                .and_then(|n| n.checked_mul(length as u128)),
        )
    }

    /// `2^(q*L) + L * space_overhead`
    pub fn predict_simulated_space(&self, length: u32) -> SpaceUnits {
        SpaceUnits::from_checked(
            self.qubits_per_char
                .checked_mul(length)
                .and_then(|bits| 1u128.checked_shl(bits))
                .and_then(|states| {
                    states.checked_add(length as u128 * self.calibration.space_overhead as u128)
                }),
        )
    }

    pub fn predict(&self, length: u32) -> ComplexityPrediction {
        ComplexityPrediction {
            length,
            classical_time: self.predict_classical_time(length),
            simulated_time: self.predict_simulated_time(length),
            classical_space: self.predict_classical_space(length),
            simulated_space: self.predict_simulated_space(length),
        }
    }

    /// Predictions for every length in `min..=max`.
    pub fn predict_range(&self, min: u32, max: u32) -> Vec<ComplexityPrediction> {
        (min..=max).map(|l| self.predict(l)).collect()
    }

    /// Scan lengths `1..=max_length` for the first where simulated time is
    /// strictly below classical time. Classical time outgrows simulated time
    /// once past the crossing, so the first hit is the only one.
    pub fn find_crossover(&self, max_length: u32) -> Option<Crossover> {
        (1..=max_length).find_map(|length| {
            let simulated_time = self.predict_simulated_time(length);
            (simulated_time < self.predict_classical_time(length))
                .then_some(Crossover { length, simulated_time })
        })
    }
}

impl Default for ComplexityPredictor {
    fn default() -> Self {
        Self::from_validated(Calibration::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
