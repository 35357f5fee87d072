//! Point values
//!
//! Scores, maxima and penalties are plain decimal numbers. Whole numbers are
//! displayed and serialized without a fractional part (`7`, not `7.0`) so the
//! rendered feedback and the stored ledger blobs read the way tutors typed them.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GradebookError;

/// Largest magnitude that is still rendered as an integer.
const WHOLE_LIMIT: f64 = 1e15;

/// A number of points.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Points(f64);

impl Points {
    pub const ZERO: Points = Points(0.0);

    pub fn new(value: f64) -> Self {
        Points(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// True when the value has no fractional part.
    pub fn is_whole(self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() < WHOLE_LIMIT
    }

    /// Always-deducting form of a penalty: `-|p|`, with zero kept as `0`.
    pub fn as_deduction(self) -> Self {
        if self.0 == 0.0 {
            Points::ZERO
        } else {
            Points(-self.0.abs())
        }
    }

    /// Clamp into `[0, max]`.
    pub fn clamp_to(self, max: Points) -> Self {
        Points(self.0.min(max.0).max(0.0))
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Points {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Points(v)),
            _ => Err(GradebookError::invalid_value("points", trimmed)),
        }
    }
}

impl From<f64> for Points {
    fn from(value: f64) -> Self {
        Points(value)
    }
}

impl From<i64> for Points {
    fn from(value: i64) -> Self {
        Points(value as f64)
    }
}

impl From<i32> for Points {
    fn from(value: i32) -> Self {
        Points(f64::from(value))
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Sub for Points {
    type Output = Points;

    fn sub(self, rhs: Points) -> Points {
        Points(self.0 - rhs.0)
    }
}

impl Neg for Points {
    type Output = Points;

    fn neg(self) -> Points {
        Points(-self.0)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if value.is_finite() {
            Ok(Points(value))
        } else {
            Err(serde::de::Error::custom("points must be finite"))
        }
    }
}
