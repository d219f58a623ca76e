use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub mod history;
pub mod scan;

pub use history::PricePoint;
pub use scan::{Candidate, Execution, MarketStatus, Rejection, ScanSnapshot, SignalDetails};

/// Signal state as assigned by the screening service.
///
/// The client never derives this value. Statuses the client does not know
/// about are kept verbatim in `Other` so newer servers keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalStatus {
    Buy,
    Setup,
    Wait,
    Other(String),
}

impl SignalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SignalStatus::Buy => "BUY",
            SignalStatus::Setup => "SETUP",
            SignalStatus::Wait => "WAIT",
            SignalStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for SignalStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "BUY" => SignalStatus::Buy,
            "SETUP" => SignalStatus::Setup,
            "WAIT" => SignalStatus::Wait,
            other => SignalStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SignalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SignalStatus::from(raw.as_str()))
    }
}
