//! Policies that shape how a scenario treats its input and compares its output.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Controls whether `\r\n` sequences in transformed text are folded to `\n`
/// before comparison with the expected final state.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LineEndingPolicy {
    /// Normalise on hosts whose native line ending is `\n`.
    #[default]
    Auto,
    /// Always normalise.
    Always,
    /// Compare the text byte for byte.
    Never,
}

/// Decides what happens when a module already has compile errors before the
/// provider runs.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputErrorPolicy {
    /// Stop the scenario with the offending diagnostics.
    #[default]
    Fail,
    /// Invoke the provider regardless.
    Tolerate,
}

impl InputErrorPolicy {
    /// Returns true when broken input stops the scenario.
    #[must_use]
    pub const fn fails_fast(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl LineEndingPolicy {
    /// Returns true when the policy folds `\r\n` on the current host.
    #[must_use]
    pub const fn normalises_on_host(self) -> bool {
        match self {
            Self::Auto => !cfg!(windows),
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Applies the policy to `text`.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        if self.normalises_on_host() {
            text.replace("\r\n", "\n")
        } else {
            text.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("auto", LineEndingPolicy::Auto)]
    #[case("ALWAYS", LineEndingPolicy::Always)]
    #[case("never", LineEndingPolicy::Never)]
    fn parses_policy_names(#[case] raw: &str, #[case] expected: LineEndingPolicy) {
        assert_eq!(LineEndingPolicy::from_str(raw).ok(), Some(expected));
    }

    #[rstest]
    #[case("fail", InputErrorPolicy::Fail, true)]
    #[case("Tolerate", InputErrorPolicy::Tolerate, false)]
    fn parses_input_error_policies(
        #[case] raw: &str,
        #[case] expected: InputErrorPolicy,
        #[case] fails_fast: bool,
    ) {
        let policy = InputErrorPolicy::from_str(raw).ok();
        assert_eq!(policy, Some(expected));
        assert_eq!(policy.map(InputErrorPolicy::fails_fast), Some(fails_fast));
    }

    #[test]
    fn always_folds_crlf() {
        assert_eq!(LineEndingPolicy::Always.apply("a\r\nb\r\n"), "a\nb\n");
    }

    #[test]
    fn never_keeps_crlf() {
        assert_eq!(LineEndingPolicy::Never.apply("a\r\nb"), "a\r\nb");
    }

    #[cfg(not(windows))]
    #[test]
    fn auto_folds_on_unix_hosts() {
        assert_eq!(LineEndingPolicy::Auto.apply("x\r\n"), "x\n");
    }
}
