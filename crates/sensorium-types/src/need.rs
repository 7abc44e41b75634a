//! Homeostatic needs.
//!
//! A `Need` is a bounded scalar that drains linearly over time (`decay`) and
//! refills with diminishing returns (`satiate`). Both operations clamp to
//! `[min_value, max_value]`, so no input can push the value out of range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Discrete banding of a need's value for prompts and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
    Satisfied,
}

impl UrgencyLevel {
    /// Band a raw value. Lower bounds are inclusive: 0.2 is `High`.
    pub fn from_value(value: f64) -> Self {
        if value < 0.2 {
            UrgencyLevel::Critical
        } else if value < 0.4 {
            UrgencyLevel::High
        } else if value < 0.6 {
            UrgencyLevel::Medium
        } else if value < 0.8 {
            UrgencyLevel::Low
        } else {
            UrgencyLevel::Satisfied
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::Critical => write!(f, "critical"),
            UrgencyLevel::High => write!(f, "high"),
            UrgencyLevel::Medium => write!(f, "medium"),
            UrgencyLevel::Low => write!(f, "low"),
            UrgencyLevel::Satisfied => write!(f, "satisfied"),
        }
    }
}

/// A single motivational pressure with decay and satiation dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Need {
    /// Unique key within an agent.
    pub name: String,
    pub value: f64,
    pub min_value: f64,
    pub max_value: f64,
    /// Units lost per second.
    pub decay_rate: f64,
    /// Default amount passed to `satiate` when none is given.
    pub satiation_rate: f64,
    /// Event type that satisfies this need (see `process_need_satisfaction`).
    pub satiation_event_type: String,
    pub last_updated: DateTime<Utc>,
    pub description: String,
}

impl Default for Need {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: 1.0,
            min_value: 0.0,
            max_value: 1.0,
            decay_rate: 0.0,
            satiation_rate: 0.1,
            satiation_event_type: String::new(),
            last_updated: Utc::now(),
            description: String::new(),
        }
    }
}

impl Need {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        let mut need = Self {
            name: name.into(),
            ..Self::default()
        };
        need.value = need.clamp(value);
        need
    }

    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn with_satiation(mut self, rate: f64, event_type: impl Into<String>) -> Self {
        self.satiation_rate = rate;
        self.satiation_event_type = event_type.into();
        self
    }

    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self.normalized()
    }

    /// Restore `min_value <= value <= max_value` on a need built from
    /// untrusted input (config files, struct literals).
    ///
    /// Swapped bounds are reordered; a NaN value becomes `min_value`.
    pub fn normalized(mut self) -> Self {
        if self.max_value < self.min_value {
            std::mem::swap(&mut self.min_value, &mut self.max_value);
        }
        self.value = if self.value.is_nan() {
            self.min_value
        } else {
            self.clamp(self.value)
        };
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Drain the need linearly by `decay_rate * elapsed_seconds`.
    ///
    /// Callers pass non-negative elapsed time.
    pub fn decay(&mut self, elapsed_seconds: f64) -> f64 {
        self.value = (self.value - self.decay_rate * elapsed_seconds).max(self.min_value);
        self.value
    }

    /// Refill the need with diminishing returns near `max_value`.
    ///
    /// The applied increment is `amount * sqrt((max - value) / max)`, so the
    /// same amount has less effect the fuller the need already is.
    pub fn satiate(&mut self, amount: Option<f64>) -> f64 {
        let amount = amount.unwrap_or(self.satiation_rate);
        let headroom = if self.max_value > 0.0 {
            ((self.max_value - self.value) / self.max_value).max(0.0)
        } else {
            0.0
        };
        let increment = amount * headroom.sqrt();
        self.value = (self.value + increment).min(self.max_value);
        self.value
    }

    /// Apply a signed impact in `[-1, 1]`, scaled by `satiation_rate`.
    ///
    /// The impact is mapped to `satiation_rate * (impact + 1) / 2`; a positive
    /// result satiates, anything else lowers the value by that amount.
    pub fn apply_impact(&mut self, impact: f64) -> f64 {
        let impact = impact.clamp(-1.0, 1.0);
        let satiation = self.satiation_rate * ((impact + 1.0) / 2.0);
        if satiation > 0.0 {
            self.satiate(Some(satiation))
        } else {
            self.value = (self.value + satiation).max(self.min_value);
            self.value
        }
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        UrgencyLevel::from_value(self.value)
    }

    /// One-line rendering for prompt context, e.g.
    /// `life_purpose: 70% satisfied (urgency: low)`.
    pub fn to_context_string(&self) -> String {
        let percent = (self.value * 100.0).floor() as i64;
        format!(
            "{}: {}% satisfied (urgency: {})",
            self.name,
            percent,
            self.urgency_level()
        )
    }

    fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_value).min(self.max_value)
    }
}
