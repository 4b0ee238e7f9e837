//! Signal model

use serde::{Deserialize, Serialize};

/// One fabricated trading signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: String,
    pub timeframe: String,
}
