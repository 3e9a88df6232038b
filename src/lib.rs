//! Request routing for wow.
//!
//! An [`Engine`] owns one segment trie per HTTP method and a flat list of
//! route groups. A request runs through the middleware of every group whose
//! prefix matches its path, then through the matched route handler (or a 404
//! handler).
//!
//! ```no_run
//! use wow_router::{Context, StatusCode};
//!
//! async fn hello(mut ctx: Context) -> Context {
//!     let name = ctx.param("name").unwrap_or("stranger").to_string();
//!     ctx.string(StatusCode::Ok, format!("hello {}", name));
//!     ctx
//! }
//!
//! async fn timing(ctx: Context) -> Context {
//!     let start = std::time::Instant::now();
//!     let ctx = ctx.next().await;
//!     println!("{} took {:?}", ctx.path(), start.elapsed());
//!     ctx
//! }
//!
//! # async_std::task::block_on(async {
//! let mut app = wow_router::new();
//! app.with(timing);
//! app.group("/v1").get("/hello/:name", hello);
//! app.serve_dir("/assets", "./static");
//! app.listen("127.0.0.1:9999").await?;
//! # http_types::Result::Ok(())
//! # });
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod group;
pub mod router;
pub mod serve_dir;
pub mod wow;

pub use config::Config;
pub use context::{Context, Handle, HandlerFunc};
pub use error::RouteError;
pub use group::RouterGroup;
pub use router::{Param, Params, Router};
pub use serve_dir::ServeDir;
pub use wow::Engine;

pub use http_types::{Method, Request, Response, Result, StatusCode};

pub fn new() -> Engine {
    Engine::new()
}

pub fn default() -> Engine {
    Engine::default()
}
