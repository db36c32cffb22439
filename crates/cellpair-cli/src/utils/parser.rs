use cellpair::core::distance::Boundary;
use cellpair::engine::config::PairStrategy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid number '{value}' in list '{list}'.")]
    InvalidNumber { value: String, list: String },

    #[error("List '{0}' is empty. Expected comma-separated values (e.g., '10,10,10').")]
    EmptyList(String),

    #[error("Unknown boundary '{0}'. Expected 'open' or 'periodic'.")]
    UnknownBoundary(String),

    #[error("Unknown pair strategy '{0}'. Expected 'all-pairs', 'cell-list' or 'auto'.")]
    UnknownStrategy(String),
}

fn parse_list<T: std::str::FromStr>(list: &str) -> Result<Vec<T>, ParseError> {
    let trimmed = list.trim().trim_start_matches('[').trim_end_matches(']');
    if trimmed.trim().is_empty() {
        return Err(ParseError::EmptyList(list.to_string()));
    }
    trimmed
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.parse().map_err(|_| ParseError::InvalidNumber {
                value: item.to_string(),
                list: list.to_string(),
            })
        })
        .collect()
}

/// Parses `"8,8,9.5"` (optionally bracketed) into floats.
pub fn parse_float_list(list: &str) -> Result<Vec<f64>, ParseError> {
    parse_list(list)
}

pub fn parse_index_list(list: &str) -> Result<Vec<usize>, ParseError> {
    parse_list(list)
}

pub fn parse_boundary(value: &str) -> Result<Boundary, ParseError> {
    match value.trim() {
        "open" => Ok(Boundary::Open),
        "periodic" => Ok(Boundary::Periodic),
        other => Err(ParseError::UnknownBoundary(other.to_string())),
    }
}

pub fn parse_strategy(value: &str) -> Result<PairStrategy, ParseError> {
    match value.trim() {
        "all-pairs" => Ok(PairStrategy::AllPairs),
        "cell-list" => Ok(PairStrategy::CellList),
        "auto" => Ok(PairStrategy::Auto),
        other => Err(ParseError::UnknownStrategy(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_lists_accept_spaces_and_brackets() {
        assert_eq!(parse_float_list("8,8,9.5"), Ok(vec![8.0, 8.0, 9.5]));
        assert_eq!(parse_float_list("[ 1.0, 2e1 ]"), Ok(vec![1.0, 20.0]));
    }

    #[test]
    fn bad_list_entries_are_named() {
        assert_eq!(
            parse_float_list("1,x"),
            Err(ParseError::InvalidNumber {
                value: "x".into(),
                list: "1,x".into()
            })
        );
        assert_eq!(parse_index_list(""), Err(ParseError::EmptyList(String::new())));
        assert!(parse_index_list("1,-2").is_err());
    }

    #[test]
    fn keywords_parse_in_kebab_case() {
        assert_eq!(parse_boundary("periodic"), Ok(Boundary::Periodic));
        assert_eq!(parse_strategy("cell-list"), Ok(PairStrategy::CellList));
        assert_eq!(
            parse_strategy("verlet"),
            Err(ParseError::UnknownStrategy("verlet".into()))
        );
        assert!(parse_boundary("Periodic").is_err());
    }
}
