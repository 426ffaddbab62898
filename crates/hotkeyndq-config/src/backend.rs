use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Selects which event backend the relay forwards commands to.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BackendMode {
    /// Resolves the known simulator event catalogue and logs each invocation.
    #[default]
    DryRun,
    /// No backend is attached; every dispatch is logged and dropped.
    Disconnected,
}

/// Errors encountered while parsing a [`BackendMode`] from text.
pub type BackendModeParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("dry_run", BackendMode::DryRun)]
    #[case("Dry_Run", BackendMode::DryRun)]
    #[case("disconnected", BackendMode::Disconnected)]
    fn parses_backend_modes(#[case] input: &str, #[case] expected: BackendMode) {
        assert_eq!(input.parse::<BackendMode>().expect("parse mode"), expected);
    }

    #[test]
    fn displays_in_snake_case() {
        assert_eq!(BackendMode::DryRun.to_string(), "dry_run");
    }
}
