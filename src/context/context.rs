use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use http_types::{Body, Method, Request, Response, StatusCode};

use crate::router::Params;

/// A link in a request's chain: either group middleware or the terminal route
/// handler.
///
/// The context is moved into each element, and the element hands it back once
/// it is done. Calling [`Context::next`] runs the rest of the chain; returning
/// without calling it stops the chain there.
pub trait Handle: Send + Sync + 'static {
    fn handle(&self, ctx: Context) -> BoxFuture<'static, Context>;
}

impl<F, Fut> Handle for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    fn handle(&self, ctx: Context) -> BoxFuture<'static, Context> {
        Box::pin((*self)(ctx))
    }
}

pub type HandlerFunc = Arc<dyn Handle>;

/// Per-request state threaded through the middleware chain.
pub struct Context {
    request: Request,
    response: Response,
    params: Params,
    handlers: Vec<HandlerFunc>,
    index: usize,
}

impl Context {
    /// A context with an empty chain and a `200 OK` response.
    pub fn new(request: Request) -> Context {
        Context {
            request,
            response: Response::new(StatusCode::Ok),
            params: Params::new(),
            handlers: Vec::new(),
            index: 0,
        }
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
        self.index = 0;
    }

    /// Runs the next element of the chain and returns the context once it and
    /// everything after it are done. At the end of the chain this is a no-op.
    pub async fn next(mut self) -> Context {
        match self.handlers.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler.handle(self).await
            }
            None => self,
        }
    }

    /// Writes `code` and `msg` and skips whatever is left of the chain, so a
    /// later `next` does nothing.
    pub fn fail(&mut self, code: StatusCode, msg: impl Into<String>) {
        self.index = self.handlers.len();
        self.string(code, msg);
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn method(&self) -> Method {
        self.request.method()
    }

    pub fn path(&self) -> &str {
        self.request.url().path()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.by_name(key)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn status(&mut self, code: StatusCode) {
        self.response.set_status(code);
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.response.set_body(body);
    }

    /// Sets the status and a `text/plain` body.
    pub fn string(&mut self, code: StatusCode, body: impl Into<String>) {
        self.status(code);
        self.response.set_body(body.into());
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}
