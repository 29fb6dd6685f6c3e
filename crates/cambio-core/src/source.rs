use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream providers the aggregator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Central-bank time-series API (SIE REST).
    Banxico,
    /// Commercial exchange-rate snapshot API.
    ExchangeRateApi,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Banxico => "banxico",
            Self::ExchangeRateApi => "exchangerate-api",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
