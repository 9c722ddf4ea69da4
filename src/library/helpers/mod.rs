//! Various small helper functions

mod duration;

pub use duration::{parse_duration, DurationParseError};

/// Splits a comma separated list into its trimmed, non-empty elements
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|element| !element.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Appends the default port to an address unless it already carries one
pub fn with_default_port(address: &str, port: u16) -> String {
    if address.contains(':') {
        address.to_owned()
    } else {
        format!("{}:{}", address, port)
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn split_lists_and_drop_empty_elements() {
        assert_eq!(
            split_list("payment_published, slack_joined,,"),
            vec!["payment_published", "slack_joined"]
        );
    }

    #[test]
    fn split_blank_input_into_nothing() {
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn append_missing_port() {
        assert_eq!(with_default_port("kafka", 9092), "kafka:9092");
        assert_eq!(with_default_port("kafka:29092", 9092), "kafka:29092");
    }
}
