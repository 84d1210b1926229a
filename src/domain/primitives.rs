//! Domain primitives: Side, Score.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two sides of a match (a player or a doubles pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposing side.
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "a"),
            Side::B => write!(f, "b"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown side token: {0}")]
pub struct SideParseError(pub String);

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Side::A),
            "b" | "B" => Ok(Side::B),
            other => Err(SideParseError(other.to_string())),
        }
    }
}

/// A pair of per-side counters (games, tiebreak points, point values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score<T> {
    pub a: T,
    pub b: T,
}

impl<T: Copy> Score<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    pub fn get(&self, side: Side) -> T {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn set(&mut self, side: Side, value: T) {
        match side {
            Side::A => self.a = value,
            Side::B => self.b = value,
        }
    }
}

impl Score<u8> {
    pub fn increment(&mut self, side: Side) {
        let value = self.get(side).saturating_add(1);
        self.set(side, value);
    }

    pub fn total(&self) -> u16 {
        u16::from(self.a) + u16::from(self.b)
    }
}

/// Tiebreak counters. An uncapped tiebreak has no upper bound on points.
impl Score<u16> {
    pub fn increment(&mut self, side: Side) {
        let value = self.get(side).saturating_add(1);
        self.set(side, value);
    }

    pub fn total(&self) -> u32 {
        u32::from(self.a) + u32::from(self.b)
    }
}
