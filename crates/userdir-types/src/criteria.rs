use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inclusive age bounds. `max: None` is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl AgeRange {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Parses `"min-max"`, `"min-"`, `"min"` or `"min+"`.
    ///
    /// Returns `None` when the lower bound is not a number, which callers
    /// treat as "no age constraint". A missing, non-numeric or zero upper
    /// bound means unbounded.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(min) = input.strip_suffix('+') {
            let min = min.trim().parse().ok()?;
            return Some(Self { min, max: None });
        }

        let mut parts = input.split('-');
        let min: u32 = parts.next()?.trim().parse().ok()?;
        let max = parts
            .next()
            .and_then(|m| m.trim().parse::<u32>().ok())
            .filter(|&m| m != 0);

        Some(Self { min, max })
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.map_or(true, |max| age <= max)
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

impl FromStr for AgeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeRange::parse(s).ok_or_else(|| format!("invalid age range '{}', expected MIN-MAX or MIN+", s))
    }
}

/// The fixed age selector choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    UpTo20,
    From21To40,
    From41To60,
    From61,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::UpTo20,
        AgeBracket::From21To40,
        AgeBracket::From41To60,
        AgeBracket::From61,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::UpTo20 => "0-20",
            AgeBracket::From21To40 => "21-40",
            AgeBracket::From41To60 => "41-60",
            AgeBracket::From61 => "61+",
        }
    }

    pub fn range(&self) -> AgeRange {
        match self {
            AgeBracket::UpTo20 => AgeRange::new(0, Some(20)),
            AgeBracket::From21To40 => AgeRange::new(21, Some(40)),
            AgeBracket::From41To60 => AgeRange::new(41, Some(60)),
            AgeBracket::From61 => AgeRange::new(61, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{}', expected male or female", other)),
        }
    }
}

/// The user-selected constraints. Every field defaults to unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.search_query.is_empty()
            && self.age_range.is_none()
            && self.nationality.as_deref().map_or(true, str::is_empty)
            && self.gender.is_none()
    }
}
