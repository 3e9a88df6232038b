use std::io;
use std::path::{Component, Path, PathBuf};

use async_std::path::Path as AsyncPath;
use futures::future::BoxFuture;
use http_types::{Body, StatusCode};
use tracing::{error, warn};

use crate::context::{Context, Handle};

/// Serves files below `root` using the path captured by a catch-all segment.
#[derive(Debug, Clone)]
pub struct ServeDir {
    root: PathBuf,
    param: String,
}

impl ServeDir {
    /// `param` is the name of the `*name` segment holding the relative path.
    /// The router hands over captures already percent-decoded, so an encoded
    /// `..%2F` arrives here as `../` and is caught by [`resolve`](Self::resolve).
    pub fn new(root: impl Into<PathBuf>, param: &str) -> ServeDir {
        ServeDir {
            root: root.into(),
            param: param.to_string(),
        }
    }

    /// Joins `file` onto the root without touching the file system. `None` if
    /// the result would leave the root.
    fn resolve(&self, file: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for component in Path::new(file).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if path == self.root {
                        return None;
                    }
                    path.pop();
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(path)
    }
}

impl Handle for ServeDir {
    fn handle(&self, mut ctx: Context) -> BoxFuture<'static, Context> {
        let file = ctx.param(&self.param).unwrap_or_default().to_string();
        let resolved = self.resolve(&file);
        Box::pin(async move {
            let path = match resolved {
                Some(path) => path,
                None => {
                    warn!("Unauthorized attempt to read: {:?}", file);
                    ctx.status(StatusCode::NotFound);
                    return ctx;
                }
            };

            if !AsyncPath::new(&path).is_file().await {
                ctx.status(StatusCode::NotFound);
                return ctx;
            }

            match Body::from_file(&path).await {
                Ok(body) => ctx.set_body(body),
                Err(e) if e.kind() == io::ErrorKind::NotFound => ctx.status(StatusCode::NotFound),
                Err(e) => {
                    error!("failed to open {:?}: {}", path, e);
                    ctx.status(StatusCode::InternalServerError);
                }
            }
            ctx
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_inside_root() {
        let dir = ServeDir::new("/srv/www", "filepath");
        assert_eq!(dir.resolve("js/a.js"), Some(PathBuf::from("/srv/www/js/a.js")));
        assert_eq!(dir.resolve("./js/../a.js"), Some(PathBuf::from("/srv/www/a.js")));
        assert_eq!(dir.resolve("../etc/passwd"), None);
        assert_eq!(dir.resolve("js/../../etc/passwd"), None);
        assert_eq!(dir.resolve("/etc/passwd"), None);
    }
}
