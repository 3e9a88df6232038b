use thiserror::Error;

/// Errors raised while registering a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("path must begin with '/' in path '{0}'")]
    MissingLeadingSlash(String),

    /// A `*name` segment was followed by more segments.
    #[error("catch-all segment '{segment}' must be the last segment in path '{path}'")]
    WildcardNotLast { segment: String, path: String },

    /// A bare `:` or `*` segment.
    #[error("parameter segment without a name in path '{0}'")]
    EmptyParamName(String),

    /// Two differently named wild segments at the same depth.
    #[error("'{segment}' in path '{path}' conflicts with existing wildcard '{existing}'")]
    ConflictingWildcard {
        segment: String,
        existing: String,
        path: String,
    },
}
