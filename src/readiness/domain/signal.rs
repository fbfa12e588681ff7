use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level readiness verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Green,
    Yellow,
    Red,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Green => "green",
            Signal::Yellow => "yellow",
            Signal::Red => "red",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with the human-readable reason for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSignal {
    pub signal: Signal,
    pub message: String,
}

impl ReadinessSignal {
    pub fn new(signal: Signal, message: impl Into<String>) -> Self {
        Self {
            signal,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_serializes_lowercase() {
        let json = serde_json::to_string(&ReadinessSignal::new(Signal::Yellow, "Open issues remain"))
            .unwrap();
        assert_eq!(json, r#"{"signal":"yellow","message":"Open issues remain"}"#);
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Red.to_string(), "red");
    }
}
