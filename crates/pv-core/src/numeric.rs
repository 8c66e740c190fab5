use crate::CoreError;

/// Floating point type used for times and sampled values.
pub type Real = f64;

/// Parse a real number from text, ignoring surrounding whitespace.
///
/// Accepts everything `f64::from_str` accepts, including exponent notation
/// (`1e-05`) and `inf`/`nan`.
pub fn parse_real(input: &str, what: &'static str) -> Result<Real, CoreError> {
    input
        .trim()
        .parse::<Real>()
        .map_err(|_| CoreError::InvalidNumber {
            what,
            input: input.to_string(),
        })
}

/// Strip trailing commas, as found on solver log tokens (`Ux,`).
pub fn strip_trailing_comma(token: &str) -> &str {
    token.trim_end_matches(',')
}
