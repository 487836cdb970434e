use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

/// Parses a number for a clap `value_parser`, rejecting values outside `range`.
pub fn parse_range_inclusive<N: PartialOrd + FromStr + Display>(
    s: &str,
    range: RangeInclusive<N>,
) -> Result<N, String> {
    let value: N = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` isn't a number"))?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "{value} is not in range {}-{}",
            range.start(),
            range.end(),
        ))
    }
}
