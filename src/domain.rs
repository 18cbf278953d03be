use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SeqdbError;

macro_rules! identifier {
    ($name:ident, $err:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = SeqdbError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim();
                if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
                    return Err(SeqdbError::$err(value.to_string()));
                }
                Ok(Self(normalized.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = SeqdbError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        // Lets membership sets be queried with keys borrowed from header lines.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(Species, InvalidSpecies);

identifier!(TaxonId, InvalidTaxonId);

identifier!(AccessionId, InvalidAccession);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Molecule {
    Protein,
    Nucleotide,
}

impl Molecule {
    pub fn short_name(self) -> &'static str {
        match self {
            Molecule::Protein => "prot",
            Molecule::Nucleotide => "nucl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyName {
    Full,
    FirstOnly,
    RandomSingle,
    RandomFraction,
    Allowlist,
}

impl StrategyName {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyName::Full => "full",
            StrategyName::FirstOnly => "first-only",
            StrategyName::RandomSingle => "random-single",
            StrategyName::RandomFraction => "random-fraction",
            StrategyName::Allowlist => "allowlist",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = SeqdbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "full" => Ok(StrategyName::Full),
            "first-only" | "first" => Ok(StrategyName::FirstOnly),
            "random-single" => Ok(StrategyName::RandomSingle),
            "random-fraction" => Ok(StrategyName::RandomFraction),
            "allowlist" => Ok(StrategyName::Allowlist),
            _ => Err(SeqdbError::InvalidStrategy(value.to_string())),
        }
    }
}

impl TryFrom<String> for StrategyName {
    type Error = SeqdbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrategyName> for String {
    fn from(value: StrategyName) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FirstOnlyAccessions {
    #[default]
    Species,
    Taxon,
}
