use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FiscError;

/// Legal structure an income is earned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scenario {
    /// Individual employment contract.
    Cim,
    /// Authorized natural person (sole proprietor).
    Pfa,
    /// Limited-liability company.
    Srl,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cim => "CIM",
            Self::Pfa => "PFA",
            Self::Srl => "SRL",
        }
    }

    pub fn parse(s: &str) -> Result<Self, FiscError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CIM" => Ok(Self::Cim),
            "PFA" => Ok(Self::Pfa),
            "SRL" => Ok(Self::Srl),
            other => Err(FiscError::Configuration(format!(
                "unknown scenario '{other}'; expected CIM, PFA or SRL"
            ))),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one entry of a comparison. SRL results are split by regime
/// so that micro and profit-tax variants can be ranked against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKey {
    #[serde(rename = "CIM")]
    Cim,
    #[serde(rename = "PFA")]
    Pfa,
    #[serde(rename = "Micro")]
    SrlMicro,
    #[serde(rename = "Profit")]
    SrlProfit,
}

impl ScenarioKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cim => "CIM (employee)",
            Self::Pfa => "PFA (real income system)",
            Self::SrlMicro => "SRL micro-company",
            Self::SrlProfit => "SRL profit tax",
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            Self::Cim => Scenario::Cim,
            Self::Pfa => Scenario::Pfa,
            Self::SrlMicro | Self::SrlProfit => Scenario::Srl,
        }
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
