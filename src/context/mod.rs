#[allow(clippy::module_inception)]
mod context;

pub use self::context::{Context, Handle, HandlerFunc};
