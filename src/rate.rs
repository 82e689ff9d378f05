//! Nominal frame rate parsing.
//!
//! Containers declare a stream's average frame rate as a rational such as
//! `"30000/1001"`. [`NominalFrameRate`] holds that rational with a non-zero
//! denominator, and [`parse_frame_rate`] turns the textual form straight into
//! frames per second.
//!
//! # Example
//!
//! ```
//! use framepace::{NominalFrameRate, parse_frame_rate};
//!
//! let ntsc: NominalFrameRate = "30000/1001".parse()?;
//! assert_eq!(ntsc.numerator(), 30000);
//! assert!((ntsc.frames_per_second() - 29.970_029_97).abs() < 1e-6);
//!
//! assert!(parse_frame_rate("30/0").is_err());
//! # Ok::<(), framepace::FramePaceError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use ffmpeg_next::Rational;

use crate::error::FramePaceError;

/// A stream-declared frame rate expressed as `numerator / denominator`.
///
/// The denominator is never zero; constructors reject such values with
/// [`FramePaceError::MalformedRate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NominalFrameRate {
    numerator: i64,
    denominator: i64,
}

impl NominalFrameRate {
    /// Create a frame rate from its two integer halves.
    ///
    /// # Errors
    ///
    /// Returns [`FramePaceError::MalformedRate`] if `denominator` is zero.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, FramePaceError> {
        if denominator == 0 {
            return Err(FramePaceError::malformed_rate(
                &format!("{numerator}/{denominator}"),
                "denominator is zero",
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The numerator as declared by the stream header.
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    /// The denominator as declared by the stream header. Never zero.
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Frames per second (`numerator / denominator`).
    pub fn frames_per_second(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl FromStr for NominalFrameRate {
    type Err = FramePaceError;

    /// Parse the exact form `"<integer>/<integer>"`.
    ///
    /// Whitespace around either integer is ignored. Anything else, including
    /// a second `/`, is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (numerator, denominator) = value
            .split_once('/')
            .ok_or_else(|| FramePaceError::malformed_rate(value, "expected `N/D`"))?;

        let numerator: i64 = numerator.trim().parse().map_err(|_| {
            FramePaceError::malformed_rate(value, "numerator is not an integer")
        })?;
        let denominator: i64 = denominator.trim().parse().map_err(|_| {
            FramePaceError::malformed_rate(value, "denominator is not an integer")
        })?;

        if denominator == 0 {
            return Err(FramePaceError::malformed_rate(value, "denominator is zero"));
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }
}

impl TryFrom<Rational> for NominalFrameRate {
    type Error = FramePaceError;

    fn try_from(rational: Rational) -> Result<Self, Self::Error> {
        Self::new(
            i64::from(rational.numerator()),
            i64::from(rational.denominator()),
        )
    }
}

impl Display for NominalFrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parse a `"N/D"` frame-rate string into frames per second.
///
/// # Errors
///
/// Returns [`FramePaceError::MalformedRate`] if the string has no `/`, either
/// side is not an integer, or the denominator is zero.
pub fn parse_frame_rate(rational: &str) -> Result<f64, FramePaceError> {
    rational
        .parse::<NominalFrameRate>()
        .map(|rate| rate.frames_per_second())
}
