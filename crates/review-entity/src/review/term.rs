//! Semester term a review refers to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic term in which the reviewed course was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "semester_term", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Spring semester.
    Spring,
    /// Fall semester.
    Fall,
}

impl Term {
    /// Return the term as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Term {
    type Err = review_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "fall" => Ok(Self::Fall),
            _ => Err(review_core::AppError::validation(format!(
                "Invalid term: '{s}'. Expected one of: spring, fall"
            ))),
        }
    }
}
