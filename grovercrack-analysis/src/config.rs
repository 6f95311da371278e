//! Run configuration, loaded from JSON and overridden from the command line.

use std::path::Path;

use grovercrack_core::{
    Alphabet, CrackError, Precompensation, SequentialCracker, SimulatorConfig, DEFAULT_SWAPS,
};
use serde::{Deserialize, Serialize};

use crate::harness::{Harness, HarnessConfig};
use crate::predict::{Calibration, ComplexityPredictor, PredictError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Crack(#[from] CrackError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Either a built-in alphabet name or an explicit symbol list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphabetSource {
    Preset(String),
    Custom(String),
}

impl Default for AlphabetSource {
    fn default() -> Self {
        AlphabetSource::Preset("printable".into())
    }
}

impl AlphabetSource {
    /// Treat `s` as a preset name if it is one, otherwise as literal symbols.
    pub fn parse(s: &str) -> Self {
        if Alphabet::preset(s).is_some() {
            AlphabetSource::Preset(s.to_string())
        } else {
            AlphabetSource::Custom(s.to_string())
        }
    }

    pub fn build(&self) -> Result<Alphabet, ConfigError> {
        match self {
            AlphabetSource::Preset(name) => Alphabet::preset(name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown alphabet preset {name:?}"))),
            AlphabetSource::Custom(symbols) => Ok(Alphabet::new(symbols)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub alphabet: AlphabetSource,
    /// Bit-position swaps applied to every code.
    pub precompensation: Vec<(u32, u32)>,
    pub simulator: SimulatorConfig,
    /// RNG seed; `None` draws from process entropy.
    pub seed: Option<u64>,
    /// `alphabet_size` is overwritten with the built alphabet's size unless
    /// `pin_calibration_alphabet` is set.
    pub calibration: Calibration,
    pub pin_calibration_alphabet: bool,
    pub harness: HarnessConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alphabet: AlphabetSource::default(),
            precompensation: DEFAULT_SWAPS.to_vec(),
            simulator: SimulatorConfig::default(),
            seed: None,
            calibration: Calibration::default(),
            pin_calibration_alphabet: false,
            harness: HarnessConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config; missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulator.validate()?;
        Precompensation::new(&self.precompensation)?;
        self.calibration.validate()?;
        if let Some(&bad) = self.harness.lengths.iter().find(|&&l| l == 0) {
            return Err(ConfigError::Invalid(format!("harness length {bad} must be positive")));
        }
        Ok(())
    }

    pub fn build_alphabet(&self) -> Result<Alphabet, ConfigError> {
        let precompensation = Precompensation::new(&self.precompensation)?;
        Ok(self.alphabet.build()?.with_precompensation(precompensation))
    }

    pub fn build_cracker(&self) -> Result<SequentialCracker, ConfigError> {
        Ok(SequentialCracker::new(self.build_alphabet()?, self.simulator.clone())?)
    }

    /// Predictor calibrated for the configured alphabet.
    pub fn build_predictor(&self) -> Result<ComplexityPredictor, ConfigError> {
        let mut calibration = self.calibration.clone();
        if !self.pin_calibration_alphabet {
            calibration.alphabet_size = self.alphabet.build()?.size() as u32;
        }
        Ok(ComplexityPredictor::new(calibration)?)
    }

    pub fn build_harness(&self) -> Result<Harness, ConfigError> {
        Ok(Harness::new(self.build_cracker()?, self.build_predictor()?, self.harness.clone()))
    }
}
