use std::path::PathBuf;
use std::sync::Arc;

use async_std::net::{TcpListener, ToSocketAddrs};
use async_std::task;
use futures::StreamExt;
use http_types::{Method, Request, Response, StatusCode};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::context::{Context, Handle, HandlerFunc};
use crate::error::RouteError;
use crate::group::{GroupEntry, RouterGroup};
use crate::router::Router;

async fn not_found(mut ctx: Context) -> Context {
    let body = format!("404 NOT FOUND: {}\n", ctx.path());
    ctx.string(StatusCode::NotFound, body);
    ctx
}

/// Owns the route tries and the group list, and dispatches requests.
///
/// Routes, groups and middleware are registered through `&mut self` during
/// setup. Serving only needs `&self`, so a configured engine can be put in an
/// `Arc` and used from any number of tasks at once.
pub struct Engine {
    pub(crate) router: Router<HandlerFunc>,
    // Flat and append-only; index 0 is the root group with an empty prefix.
    pub(crate) groups: Vec<GroupEntry>,
    pub(crate) config: Config,
    not_found: HandlerFunc,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Engine {
        Engine::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Engine {
        Engine {
            router: Router::new(),
            groups: vec![GroupEntry {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
            config,
            not_found: Arc::new(not_found),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The root group. Middleware attached here runs for every request.
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, 0)
    }

    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let mut root = RouterGroup::new(self, 0);
        let index = root.group(prefix).index();
        RouterGroup::new(self, index)
    }

    pub fn with(&mut self, middleware: impl Handle) -> &mut Self {
        self.root().with(middleware);
        self
    }

    pub fn try_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handle,
    ) -> Result<&mut Self, RouteError> {
        self.root().try_route(method, pattern, handler)?;
        Ok(self)
    }

    pub fn route(&mut self, method: Method, pattern: &str, handler: impl Handle) -> &mut Self {
        self.root().route(method, pattern, handler);
        self
    }

    pub fn get(&mut self, pattern: &str, handler: impl Handle) -> &mut Self {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: impl Handle) -> &mut Self {
        self.route(Method::Post, pattern, handler)
    }

    pub fn serve_dir(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.root().serve_dir(relative_path, root);
        self
    }

    /// Replaces the handler run when no route matches. Group middleware still
    /// runs in front of it.
    pub fn set_not_found(&mut self, handler: impl Handle) -> &mut Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Methods with a route for `path`.
    pub fn allowed(&self, path: &str) -> Vec<Method> {
        self.router.allowed(path)
    }

    /// Dispatches one request.
    ///
    /// The chain is the middleware of every group whose prefix matches the
    /// path, in group registration order, followed by the matched route
    /// handler or the not-found handler.
    pub async fn handle(&self, req: Request) -> Response {
        let mut ctx = Context::new(req);
        let path = ctx.path().to_string();

        let mut handlers: Vec<HandlerFunc> = self
            .groups
            .iter()
            .filter(|group| self.config.prefix_applies(&group.prefix, &path))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect();

        match self.router.get_route(ctx.method(), &path) {
            Some((handler, params)) => {
                ctx.set_params(params);
                handlers.push(handler.clone());
            }
            None => {
                debug!("no route for {} {}", ctx.method(), path);
                handlers.push(self.not_found.clone());
            }
        }

        ctx.set_handlers(handlers);
        ctx.next().await.into_response()
    }

    /// Accepts HTTP/1 connections on `addr` and serves each one on its own
    /// task until the listener fails.
    pub async fn listen(self, addr: impl ToSocketAddrs) -> http_types::Result<()> {
        let engine = Arc::new(self);
        let listener = TcpListener::bind(addr).await?;
        info!("listening on http://{}", listener.local_addr()?);

        let mut incoming = listener.incoming();
        while let Some(stream) = incoming.next().await {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    error!("failed to accept connection: {}", err);
                    continue;
                }
            };
            let engine = engine.clone();
            task::spawn(async move {
                let result = async_h1::accept(stream.clone(), |req| {
                    let engine = engine.clone();
                    async move { Ok(engine.handle(req).await) }
                })
                .await;
                if let Err(err) = result {
                    error!("connection error: {}", err);
                }
            });
        }
        Ok(())
    }
}
