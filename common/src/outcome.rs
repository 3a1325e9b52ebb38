use serde::{Deserialize, Serialize};

/// Binary treatment outcome as rendered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Recovered,
    DidNotRecover,
}

impl Outcome {
    /// Label 1 means recovered; every other value means the treatment
    /// did not succeed.
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            Self::Recovered
        } else {
            Self::DidNotRecover
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recovered => "RECOVERED",
            Self::DidNotRecover => "DID NOT RECOVER",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
