/// Engine behaviour switches. Everything is off except route logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Group middleware applies to every request whose path starts with the
    // group prefix as a plain string, so `/user` middleware also runs for
    // `/users`. When enabled, the prefix must additionally end on a segment
    // boundary: the path ends right after it or continues with '/'.
    pub strict_group_prefix: bool,

    // Emit a debug event for every registered route.
    pub log_routes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strict_group_prefix: false,
            log_routes: true,
        }
    }
}

impl Config {
    /// Whether middleware of a group with `prefix` applies to `path`.
    pub(crate) fn prefix_applies(&self, prefix: &str, path: &str) -> bool {
        if !path.starts_with(prefix) {
            return false;
        }
        if !self.strict_group_prefix || prefix.is_empty() || prefix.ends_with('/') {
            return true;
        }
        let rest = &path[prefix.len()..];
        rest.is_empty() || rest.starts_with('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_prefix_matches_any_string_prefix() {
        let config = Config::default();
        assert!(config.prefix_applies("", "/anything"));
        assert!(config.prefix_applies("/user", "/users/1"));
        assert!(!config.prefix_applies("/api", "/ap"));
    }

    #[test]
    fn strict_prefix_requires_segment_boundary() {
        let config = Config {
            strict_group_prefix: true,
            ..Config::default()
        };
        assert!(config.prefix_applies("/user", "/user"));
        assert!(config.prefix_applies("/user", "/user/1"));
        assert!(!config.prefix_applies("/user", "/users/1"));
        assert!(config.prefix_applies("", "/users"));
    }
}
