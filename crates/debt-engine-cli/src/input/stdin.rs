use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped JSON from stdin.
/// Returns None if stdin is a TTY or nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin: {}", e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use debt_engine_core::repayment::StrategyComparisonInput;

    #[test]
    fn test_blank_input_is_none() {
        let parsed: Option<StrategyComparisonInput> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_portfolio_parsed() {
        let parsed: Option<StrategyComparisonInput> =
            parse_piped(r#"{"debts": [], "extra_monthly_payment": "10"}"#).unwrap();
        assert!(parsed.unwrap().debts.is_empty());
    }
}
