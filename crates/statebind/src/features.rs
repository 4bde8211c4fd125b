//! Version feature flags consulted by the encoder and validator

/// Environment variable enabling next-major-version behaviour
pub const ENV_NEXT_MAJOR_VERSION: &str = "TYPEDSTATE_NEXT_MAJOR_VERSION";

/// Provider-wide feature switches.
///
/// Passed by value into every encode/validate call; the engine never
/// changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// Next-major-version behaviour is active
    pub next_major_version: bool,
}

impl Features {
    /// Features with next-major-version behaviour switched on
    pub fn next_major() -> Self {
        Self {
            next_major_version: true,
        }
    }

    /// Read features from the environment, using `default` when
    /// [`ENV_NEXT_MAJOR_VERSION`] is unset
    pub fn from_env_or(default: bool) -> Self {
        let value = std::env::var(ENV_NEXT_MAJOR_VERSION).ok();
        let features = Self::resolve(value.as_deref(), default);
        log::debug!("{ENV_NEXT_MAJOR_VERSION}={value:?} -> {features:?}");
        features
    }

    /// Features for an environment value; `None` means unset
    pub fn resolve(env: Option<&str>, default: bool) -> Self {
        Self {
            next_major_version: env.map(parse_flag).unwrap_or(default),
        }
    }
}

/// Interpret a truthy environment value
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("On"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("enabled"));
    }

    #[test]
    fn test_default_is_off() {
        assert!(!Features::default().next_major_version);
        assert!(Features::next_major().next_major_version);
    }

    #[test]
    fn test_resolve_env_over_default() {
        assert_eq!(Features::resolve(Some("yes"), false), Features::next_major());
        assert_eq!(Features::resolve(Some("0"), true), Features::default());
        assert_eq!(Features::resolve(None, true), Features::next_major());
        assert_eq!(Features::resolve(None, false), Features::default());
    }

    #[test]
    fn test_from_env_or_falls_back_when_unset() {
        if std::env::var_os(ENV_NEXT_MAJOR_VERSION).is_none() {
            assert_eq!(Features::from_env_or(true), Features::next_major());
            assert_eq!(Features::from_env_or(false), Features::default());
        }
    }
}
