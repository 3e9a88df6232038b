use std::path::PathBuf;
use std::sync::Arc;

use http_types::Method;
use tracing::{debug, warn};

use crate::context::Handle;
use crate::error::RouteError;
use crate::serve_dir::ServeDir;
use crate::wow::Engine;

/// Name of the catch-all segment registered by [`RouterGroup::serve_dir`].
const FILEPATH_PARAM: &str = "filepath";

/// Prefix and middleware of one group, stored in the engine's flat list.
pub(crate) struct GroupEntry {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<Arc<dyn Handle>>,
}

/// `Route  GET - /path`, with the method right-aligned to four columns.
fn route_line(method: Method, pattern: &str) -> String {
    let name: &str = method.as_ref();
    format!("Route {:>4} - {}", name, pattern)
}

/// Registration handle for a group of routes sharing a path prefix.
///
/// Holding a group borrows the [`Engine`] mutably, so all registration happens
/// before the engine is shared for serving.
pub struct RouterGroup<'a> {
    engine: &'a mut Engine,
    index: usize,
}

macro_rules! method_shortcuts {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            #[doc = concat!(
                "Shortcut for `route(Method::",
                stringify!($method),
                ", pattern, handler)`."
            )]
            pub fn $name(&mut self, pattern: &str, handler: impl Handle) -> &mut Self {
                self.route(Method::$method, pattern, handler)
            }
        )*
    };
}

impl<'a> RouterGroup<'a> {
    pub(crate) fn new(engine: &'a mut Engine, index: usize) -> RouterGroup<'a> {
        RouterGroup { engine, index }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Creates a subgroup whose prefix is this group's prefix followed by
    /// `prefix`. The subgroup joins the engine's flat group list; nesting is
    /// only expressed through the prefix string.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let prefix = format!("{}{}", self.prefix(), prefix);
        let groups = &mut self.engine.groups;
        groups.push(GroupEntry {
            prefix,
            middlewares: Vec::new(),
        });
        let index = groups.len() - 1;
        RouterGroup::new(self.engine, index)
    }

    /// Appends a middleware. It runs for every request whose path starts with
    /// this group's prefix, whether or not a route matches.
    pub fn with(&mut self, middleware: impl Handle) -> &mut Self {
        self.engine.groups[self.index]
            .middlewares
            .push(Arc::new(middleware));
        self
    }

    /// Registers `handler` for `method` at this group's prefix plus `pattern`.
    pub fn try_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handle,
    ) -> Result<&mut Self, RouteError> {
        let pattern = format!("{}{}", self.prefix(), pattern);
        let replaced = self
            .engine
            .router
            .add_route(method, &pattern, Arc::new(handler))?;
        if self.engine.config.log_routes {
            debug!("{}", route_line(method, &pattern));
        }
        if replaced.is_some() {
            warn!("Route {} {} registered twice, keeping the last handler", method, pattern);
        }
        Ok(self)
    }

    /// Like [`try_route`](Self::try_route) but panics on a malformed pattern.
    pub fn route(&mut self, method: Method, pattern: &str, handler: impl Handle) -> &mut Self {
        if let Err(err) = self.try_route(method, pattern, handler) {
            panic!("{}", err);
        }
        self
    }

    method_shortcuts! {
        get => Get,
        post => Post,
        put => Put,
        patch => Patch,
        delete => Delete,
        head => Head,
        options => Options,
    }

    /// Serves the files under `root` at `relative_path`, relative to this
    /// group. Missing files and paths escaping `root` answer 404.
    pub fn serve_dir(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        let pattern = format!(
            "{}/*{}",
            relative_path.trim_end_matches('/'),
            FILEPATH_PARAM
        );
        self.get(&pattern, ServeDir::new(root, FILEPATH_PARAM))
    }
}
