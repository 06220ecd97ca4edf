//! Options for noise detection and restoration.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Default ratio of in-band characters at which a row counts as noised.
pub const DEFAULT_THRESHOLD: f64 = 0.25;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "rtzr/ko-gemma-2-9b-it";

/// Turn-end marker of the Gemma chat template.
pub const END_OF_TURN: &str = "<end_of_turn>";

/// Options for controlling noise detection.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Ratio at or above which a row is noised (0.0-1.0).
    pub threshold: f64,

    /// What the in-band character count is divided by.
    pub denominator: RatioDenominator,

    /// Whether to classify rows in parallel.
    pub parallel: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            denominator: RatioDenominator::TextLength,
            parallel: true,
        }
    }
}

impl DetectOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the noise threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Divides by the row's field count, reproducing legacy ratios.
    pub fn legacy_ratio(mut self) -> Self {
        self.denominator = RatioDenominator::FieldCount;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Checks the threshold against the range of the chosen ratio.
    ///
    /// Text-length ratios lie in `0.0..=1.0`. Field-count ratios have no
    /// upper bound, so only NaN and negative thresholds are rejected.
    pub fn validate(&self) -> Result<()> {
        let valid = match self.denominator {
            RatioDenominator::TextLength => (0.0..=1.0).contains(&self.threshold),
            RatioDenominator::FieldCount => self.threshold >= 0.0,
        };
        if !valid {
            let range = match self.denominator {
                RatioDenominator::TextLength => "within 0.0..=1.0",
                RatioDenominator::FieldCount => "non-negative",
            };
            return Err(Error::InvalidConfig(format!(
                "threshold must be {}, got {}",
                range, self.threshold
            )));
        }
        Ok(())
    }
}

/// Denominator of the in-band character ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioDenominator {
    /// Number of characters in the text. Empty text has ratio 0.
    #[default]
    TextLength,
    /// Number of fields in the row.
    ///
    /// Ratios can exceed 1.0 under this mode.
    FieldCount,
}

/// Sampling parameters for restoration requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Model identifier passed to the backend.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling probability mass.
    pub top_p: f32,

    /// Maximum number of generated tokens.
    pub max_new_tokens: u32,

    /// Whether to sample. Greedy decoding sends temperature 0.
    pub do_sample: bool,

    /// Extra stop markers besides the model's end-of-sequence.
    pub stop: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.6,
            top_p: 0.9,
            max_new_tokens: 2048,
            do_sample: true,
            stop: vec![END_OF_TURN.to_string()],
        }
    }
}

impl ConvertOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the nucleus sampling mass.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the generation length limit.
    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Disables sampling.
    pub fn greedy(mut self) -> Self {
        self.do_sample = false;
        self
    }

    /// Temperature actually sent to the backend.
    pub fn effective_temperature(&self) -> f32 {
        if self.do_sample {
            self.temperature
        } else {
            0.0
        }
    }

    /// Checks sampling parameters.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::InvalidConfig("model must not be empty".into()));
        }
        if self.temperature.is_nan() || self.temperature < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "top_p must be within (0.0, 1.0], got {}",
                self.top_p
            )));
        }
        if self.max_new_tokens == 0 {
            return Err(Error::InvalidConfig("max_new_tokens must be positive".into()));
        }
        Ok(())
    }
}
