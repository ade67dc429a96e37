//! Launch targets.
//!
//! Target names are matched after normalization (lowercase, non-word
//! characters removed), so `run-tests`, `RunTests` and `runtests` are the
//! same target. Anything else is rejected at parse time with [`UnknownTarget`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Install or verify dependencies in the service runtime
    CreateEnv,
    /// Listen for upstream events and record them
    Leecher,
    /// Consume recorded events and apply sync logic
    Processor,
    /// Propagate local changes to Airtable
    Transmitter,
    /// All three services at once
    Services,
    /// Install the addon in a test runtime and run the test suite
    RunTests,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown function `{0}`")]
pub struct UnknownTarget(pub String);

/// Lowercase and drop every non-word character (`_` is a word character).
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::CreateEnv,
        Target::Leecher,
        Target::Processor,
        Target::Transmitter,
        Target::Services,
        Target::RunTests,
    ];

    /// Name shown in help output.
    pub fn keyword(&self) -> &'static str {
        match self {
            Target::CreateEnv => "create-env",
            Target::Leecher => "leecher",
            Target::Processor => "processor",
            Target::Transmitter => "transmitter",
            Target::Services => "services",
            Target::RunTests => "run-tests",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Target::CreateEnv => "Install service dependencies into the isolated runtime",
            Target::Leecher => "Run the leecher service",
            Target::Processor => "Run the processor service",
            Target::Transmitter => "Run the transmitter service",
            Target::Services => "Run leecher, processor and transmitter together",
            Target::RunTests => "Run the test suite in a dedicated test runtime",
        }
    }

    /// Value for the entry point's `--service` flag, if this target launches one.
    pub fn service_flag(&self) -> Option<&'static str> {
        match self {
            Target::Leecher => Some("leecher"),
            Target::Processor => Some("processor"),
            Target::Transmitter => Some("transmitter"),
            Target::Services => Some("all"),
            Target::CreateEnv | Target::RunTests => None,
        }
    }

    pub fn uses_test_runtime(&self) -> bool {
        matches!(self, Target::RunTests)
    }
}

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "createenv" => Ok(Target::CreateEnv),
            "leecher" => Ok(Target::Leecher),
            "processor" => Ok(Target::Processor),
            "transmitter" => Ok(Target::Transmitter),
            "services" => Ok(Target::Services),
            "runtests" => Ok(Target::RunTests),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        for raw in ["Leecher", "LEECHER", "leecher", " leecher "] {
            assert_eq!(raw.parse::<Target>().unwrap(), Target::Leecher);
        }
    }

    #[test]
    fn test_punctuation_insensitive() {
        assert_eq!("run-tests".parse::<Target>().unwrap(), Target::RunTests);
        assert_eq!("runtests".parse::<Target>().unwrap(), Target::RunTests);
        assert_eq!("Create-Env".parse::<Target>().unwrap(), Target::CreateEnv);
        assert_eq!("create.env".parse::<Target>().unwrap(), Target::CreateEnv);
    }

    #[test]
    fn test_underscore_is_a_word_character() {
        assert_eq!(normalize("run_tests"), "run_tests");
        assert!("run_tests".parse::<Target>().is_err());
    }

    #[test]
    fn test_unknown_target_keeps_raw_name() {
        let err = "leach".parse::<Target>().unwrap_err();
        assert_eq!(err, UnknownTarget("leach".to_string()));
        assert_eq!(err.to_string(), "unknown function `leach`");
    }

    #[test]
    fn test_keywords_round_trip() {
        for target in Target::ALL {
            assert_eq!(target.keyword().parse::<Target>().unwrap(), target);
        }
    }

    #[test]
    fn test_service_flags() {
        assert_eq!(Target::Services.service_flag(), Some("all"));
        assert_eq!(Target::Processor.service_flag(), Some("processor"));
        assert_eq!(Target::CreateEnv.service_flag(), None);
        assert_eq!(Target::RunTests.service_flag(), None);
        assert!(Target::RunTests.uses_test_runtime());
        assert!(!Target::Leecher.uses_test_runtime());
    }
}
