//! Per-method segment tries.
//!
//! Patterns are split on `/` into segments. A segment is either static
//! (`users`), a named parameter (`:name`, exactly one path segment) or a
//! catch-all (`*name`, the rest of the path, last segment only).

mod trie;

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Index;

use http_types::Method;

use crate::error::RouteError;
use trie::TrieNode;

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    pub fn new(key: &str, value: &str) -> Param {
        Param {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Values captured by `:name` and `*name` segments, in path order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(pub Vec<Param>);

impl Params {
    /// Returns the value of the first Param which key matches the given name.
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|param| param.key == name)
            .map(|param| param.value.as_str())
    }

    pub fn new() -> Params {
        Params(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, p: Param) {
        self.0.push(p);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }
}

impl Index<usize> for Params {
    type Output = str;

    fn index(&self, i: usize) -> &Self::Output {
        &(self.0)[i].value
    }
}

/// Splits a request path into its non-empty segments.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// Splits a request path and percent-decodes each segment. Splitting comes
/// first, so an encoded `%2F` stays inside its segment. `None` if a segment
/// does not decode to UTF-8.
fn decode_path(path: &str) -> Option<Vec<Cow<'_, str>>> {
    split_path(path)
        .into_iter()
        .map(|part| urlencoding::decode(part).ok())
        .collect()
}

/// Splits and validates a route pattern.
fn parse_pattern(pattern: &str) -> Result<Vec<&str>, RouteError> {
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
    }

    let parts = split_path(pattern);
    for (i, part) in parts.iter().enumerate() {
        if (part.starts_with(':') || part.starts_with('*')) && part.len() == 1 {
            return Err(RouteError::EmptyParamName(pattern.to_string()));
        }
        if part.starts_with('*') && i + 1 != parts.len() {
            return Err(RouteError::WildcardNotLast {
                segment: part.to_string(),
                path: pattern.to_string(),
            });
        }
    }
    Ok(parts)
}

/// Route table holding one trie per HTTP method.
///
/// Mutation needs `&mut self` and lookups only `&self`, so a fully built
/// router can be shared between threads without locking.
#[derive(Debug)]
pub struct Router<T> {
    trees: HashMap<Method, TrieNode<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Router::new()
    }
}

impl<T> Router<T> {
    pub fn new() -> Router<T> {
        Router {
            trees: HashMap::new(),
        }
    }

    /// Registers `handle` for `method` and `pattern`.
    ///
    /// Registering the same method and pattern again replaces the earlier
    /// handler, which is returned. A malformed pattern leaves the router
    /// untouched.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handle: T,
    ) -> Result<Option<T>, RouteError> {
        let parts = parse_pattern(pattern)?;
        self.trees
            .entry(method)
            .or_insert_with(TrieNode::new)
            .insert(pattern, &parts, handle)
    }

    /// Looks up the handler for a method + path combo together with the
    /// captured parameters. `None` means "not found".
    ///
    /// Segments are matched and captured in decoded form; a path that is not
    /// valid percent-encoded UTF-8 matches nothing.
    pub fn get_route(&self, method: Method, path: &str) -> Option<(&T, Params)> {
        let root = self.trees.get(&method)?;
        let decoded = decode_path(path)?;
        let parts: Vec<&str> = decoded.iter().map(|part| part.as_ref()).collect();
        let mut params = Params::new();
        root.search(&parts, &mut params)
            .map(|handle| (handle, params))
    }

    /// Methods that have a handler for `path`, sorted by name.
    pub fn allowed(&self, path: &str) -> Vec<Method> {
        let decoded = match decode_path(path) {
            Some(decoded) => decoded,
            None => return Vec::new(),
        };
        let parts: Vec<&str> = decoded.iter().map(|part| part.as_ref()).collect();
        let mut allow: Vec<Method> = self
            .trees
            .iter()
            .filter(|(_, root)| root.search(&parts, &mut Params::new()).is_some())
            .map(|(method, _)| *method)
            .collect();
        allow.sort_by_key(|method| method.to_string());
        allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(routes: &[(Method, &'static str)]) -> Router<&'static str> {
        let mut router = Router::new();
        for (method, pattern) in routes {
            router.add_route(*method, pattern, *pattern).unwrap();
        }
        router
    }

    #[test]
    fn static_routes_match_without_params() {
        let router = router(&[
            (Method::Get, "/"),
            (Method::Get, "/hello"),
            (Method::Get, "/hello/world"),
        ]);
        for path in &["/", "/hello", "/hello/world"] {
            let (handle, params) = router.get_route(Method::Get, path).unwrap();
            assert_eq!(handle, path);
            assert!(params.is_empty());
        }
    }

    #[test]
    fn named_param_takes_one_segment() {
        let router = router(&[(Method::Get, "/user/:name")]);
        let (_, params) = router.get_route(Method::Get, "/user/alice").unwrap();
        assert_eq!(params.by_name("name"), Some("alice"));
        assert_eq!(&params[0], "alice");
        assert!(router.get_route(Method::Get, "/user/alice/extra").is_none());
    }

    #[test]
    fn catch_all_keeps_slashes() {
        let router = router(&[(Method::Get, "/assets/*filepath")]);
        let (_, params) = router.get_route(Method::Get, "/assets/js/a.js").unwrap();
        assert_eq!(params.by_name("filepath"), Some("js/a.js"));
    }

    #[test]
    fn captures_are_percent_decoded() {
        let router = router(&[
            (Method::Get, "/user/:name"),
            (Method::Get, "/files/*path"),
            (Method::Get, "/café"),
        ]);
        let (_, params) = router.get_route(Method::Get, "/user/j%C3%B6rg").unwrap();
        assert_eq!(params.by_name("name"), Some("jörg"));

        let (_, params) = router.get_route(Method::Get, "/files/a%20b/..%2Fc").unwrap();
        assert_eq!(params.by_name("path"), Some("a b/../c"));

        let (handle, _) = router.get_route(Method::Get, "/caf%C3%A9").unwrap();
        assert_eq!(*handle, "/café");
    }

    #[test]
    fn encoded_slash_stays_in_one_segment() {
        let router = router(&[(Method::Get, "/user/:name")]);
        let (_, params) = router.get_route(Method::Get, "/user/a%2Fb").unwrap();
        assert_eq!(params.by_name("name"), Some("a/b"));
        assert_eq!(params.iter().count(), 1);
    }

    #[test]
    fn invalid_utf8_escape_is_not_found() {
        let router = router(&[(Method::Get, "/user/:name")]);
        assert!(router.get_route(Method::Get, "/user/%FF").is_none());
        assert!(router.allowed("/user/%FF").is_empty());
    }

    #[test]
    fn empty_segments_are_collapsed() {
        let router = router(&[(Method::Get, "/a/b")]);
        assert!(router.get_route(Method::Get, "//a///b/").is_some());
    }

    #[test]
    fn unknown_method_is_not_found() {
        let router = router(&[(Method::Get, "/a")]);
        assert!(router.get_route(Method::Post, "/a").is_none());
        assert!(router.get_route(Method::Get, "/does/not/exist").is_none());
    }

    #[test]
    fn lookup_is_repeatable() {
        let router = router(&[(Method::Get, "/p/:id"), (Method::Get, "/p/static")]);
        let first = router.get_route(Method::Get, "/p/9").map(|(h, p)| (*h, p));
        let second = router.get_route(Method::Get, "/p/9").map(|(h, p)| (*h, p));
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_registration_overwrites() {
        let mut router = Router::new();
        assert_eq!(router.add_route(Method::Get, "/dup", 1).unwrap(), None);
        assert_eq!(router.add_route(Method::Get, "/dup", 2).unwrap(), Some(1));
        assert_eq!(router.get_route(Method::Get, "/dup").map(|(h, _)| *h), Some(2));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        let mut router: Router<()> = Router::new();
        assert_eq!(
            router.add_route(Method::Get, "no-slash", ()),
            Err(RouteError::MissingLeadingSlash("no-slash".into()))
        );
        assert!(matches!(
            router.add_route(Method::Get, "/a/*rest/b", ()),
            Err(RouteError::WildcardNotLast { .. })
        ));
        assert!(matches!(
            router.add_route(Method::Get, "/a/:", ()),
            Err(RouteError::EmptyParamName(_))
        ));
        assert!(router.get_route(Method::Get, "/a/x").is_none());
    }

    #[test]
    fn allowed_lists_matching_methods() {
        let router = router(&[
            (Method::Get, "/item/:id"),
            (Method::Post, "/item/:id"),
            (Method::Delete, "/other"),
        ]);
        assert_eq!(router.allowed("/item/3"), vec![Method::Get, Method::Post]);
        assert!(router.allowed("/nothing").is_empty());
    }
}
