//! Line classification for FOAM solver logs.

use pv_core::{Real, parse_real, strip_trailing_comma};

pub const TIME_PREFIX: &str = "Time = ";
pub const RESIDUAL_PREFIX: &str = "DILUPBiCG";
pub const FORCE_BLOCK_PREFIX: &str = "forceCoeffs output:";

/// Token positions on a residual line such as
/// `DILUPBiCG:  Solving for Ux, Initial residual = 0.0012, Final residual = ...`.
const RESIDUAL_FIELD_TOKEN: usize = 3;
const RESIDUAL_VALUE_TOKEN: usize = 7;

/// What a single log line means to the series accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    TimeMarker(Real),
    ResidualRecord { field: String, value: Real },
    ForceBlockStart,
    ForceCoefficientRecord { name: String, value: Real },
    BlockEnd,
    Unclassified,
}

/// Why a recognised line could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    #[error("expected at least {expected} tokens, found {found}")]
    TooFewTokens { expected: usize, found: usize },

    #[error("'{token}' is not a number")]
    InvalidNumber { token: String },

    #[error("force coefficient line has no '='")]
    MissingEquals,
}

fn number(token: &str) -> Result<Real, LineFault> {
    parse_real(token, "log value").map_err(|_| LineFault::InvalidNumber {
        token: token.trim().to_string(),
    })
}

/// Classify `line`. `inside_force_block` is the accumulator's current state;
/// coefficient records and block ends are only recognised while it is set.
pub fn classify_line(line: &str, inside_force_block: bool) -> Result<LineKind, LineFault> {
    if let Some(rest) = line.strip_prefix(TIME_PREFIX) {
        return number(rest).map(LineKind::TimeMarker);
    }

    if line.starts_with(RESIDUAL_PREFIX) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= RESIDUAL_VALUE_TOKEN {
            return Err(LineFault::TooFewTokens {
                expected: RESIDUAL_VALUE_TOKEN + 1,
                found: words.len(),
            });
        }
        let field = strip_trailing_comma(words[RESIDUAL_FIELD_TOKEN]).to_string();
        let value = number(strip_trailing_comma(words[RESIDUAL_VALUE_TOKEN]))?;
        return Ok(LineKind::ResidualRecord { field, value });
    }

    if line.starts_with(FORCE_BLOCK_PREFIX) {
        return Ok(LineKind::ForceBlockStart);
    }

    if inside_force_block {
        if !line.starts_with(' ') {
            return Ok(LineKind::BlockEnd);
        }
        let (name, value) = line.split_once('=').ok_or(LineFault::MissingEquals)?;
        return Ok(LineKind::ForceCoefficientRecord {
            name: name.trim().to_string(),
            value: number(value)?,
        });
    }

    Ok(LineKind::Unclassified)
}
