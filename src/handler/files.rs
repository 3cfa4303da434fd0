//! Data file serving
//!
//! Resolves the path segment after the data route prefix against the data
//! directory and streams the file back. The path comes straight from the
//! client, so it is decoded, shape-checked, and then canonicalize-checked
//! against the data root before any byte is read.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Component, Path};
use tokio::fs;

/// Why a data file could not be loaded.
enum LoadError {
    /// Missing, a directory, or outside the data root: 404 to the client.
    NotFound,
    /// Unexpected I/O failure: 500 to the client, details in the log.
    Io(std::io::Error),
}

/// Serve one file from the data directory.
pub async fn serve_data_file(
    ctx: &RequestContext<'_>,
    site: &SiteConfig,
    filename: &str,
) -> Response<Full<Bytes>> {
    match load_data_file(&site.data_dir, filename).await {
        Ok((content, content_type)) => file_response(&content, content_type, ctx),
        Err(LoadError::NotFound) => http::build_404_response(),
        Err(LoadError::Io(e)) => {
            logger::log_error(&format!("Failed to read data file '{filename}': {e}"));
            http::build_500_response()
        }
    }
}

/// Load a file strictly from inside the data directory.
///
/// The resolved path is canonicalized and must stay under the canonicalized
/// data root; symlinks that point outside it are refused like any other
/// escape.
async fn load_data_file(
    data_dir: &str,
    filename: &str,
) -> Result<(Vec<u8>, &'static str), LoadError> {
    let Ok(decoded) = percent_decode_str(filename).decode_utf8() else {
        return Err(LoadError::NotFound);
    };

    let relative = Path::new(decoded.as_ref());
    if relative.as_os_str().is_empty() {
        return Err(LoadError::NotFound);
    }
    if !is_plain_relative(relative) {
        logger::log_warning(&format!("Path traversal attempt blocked: {filename}"));
        return Err(LoadError::NotFound);
    }

    let data_root = match fs::canonicalize(data_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Data directory not found or inaccessible '{data_dir}': {e}"
            ));
            return Err(LoadError::NotFound);
        }
    };

    let file_path = match fs::canonicalize(data_root.join(relative)).await {
        Ok(p) => p,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound),
        Err(e) => return Err(LoadError::Io(e)),
    };

    if !file_path.starts_with(&data_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {filename} -> {}",
            file_path.display()
        ));
        return Err(LoadError::NotFound);
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        // Directories and vanished files are both plain 404s
        Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::IsADirectory => {
            return Err(LoadError::NotFound)
        }
        Err(e) => return Err(LoadError::Io(e)),
    };

    let content_type = mime::content_type_for(file_path.extension().and_then(|e| e.to_str()));
    Ok((content, content_type))
}

/// A request path may only contain normal segments (`a/b/c.txt`); anything
/// rooted or containing `..` is rejected before touching the filesystem.
fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Build the success response: 304 for a fresh client cache, 206/416 for
/// range requests, full 200 otherwise.
fn file_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(range) => {
            let start = range.start;
            let end = range.resolved_end(total_size);
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => http::response::build_file_response(
            Bytes::from(data.to_owned()),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn site_with_data_dir(dir: &std::path::Path) -> SiteConfig {
        SiteConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_plain_relative_check() {
        assert!(is_plain_relative(Path::new("nodes.csv")));
        assert!(is_plain_relative(Path::new("sub/dir/file.json")));
        assert!(is_plain_relative(Path::new("./file.json")));
        assert!(!is_plain_relative(Path::new("../secret")));
        assert!(!is_plain_relative(Path::new("sub/../../secret")));
        assert!(!is_plain_relative(Path::new("/etc/passwd")));
    }

    #[tokio::test]
    async fn test_serves_file_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nodes.csv"), "id,label\n1,a\n").unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/nodes.csv"), &site, "nodes.csv").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/csv; charset=utf-8"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"id,label\n1,a\n");
    }

    #[tokio::test]
    async fn test_serves_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("2024")).unwrap();
        std::fs::write(dir.path().join("2024/edges.json"), "[]").unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/2024/edges.json"), &site, "2024/edges.json").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_percent_decoded_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my data.txt"), "x").unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/my%20data.txt"), &site, "my%20data.txt").await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/absent.csv"), &site, "absent.csv").await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_is_404_without_content() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
        let inner = outer.path().join("data");
        std::fs::create_dir(&inner).unwrap();
        let site = site_with_data_dir(&inner);

        for attempt in ["../secret.txt", "..%2Fsecret.txt", "a/../../secret.txt"] {
            let resp = serve_data_file(&ctx("/data/x"), &site, attempt).await;
            assert_eq!(resp.status(), 404, "attempt: {attempt}");
            let body = resp.into_body().collect().await.unwrap().to_bytes();
            assert!(!body.windows(10).any(|w| w == b"top secret"));
        }
    }

    #[tokio::test]
    async fn test_absolute_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/x"), &site, "/etc/passwd").await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let site = site_with_data_dir(dir.path());

        let resp = serve_data_file(&ctx("/data/sub"), &site, "sub").await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_if_none_match_gives_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "body").unwrap();
        let site = site_with_data_dir(dir.path());

        let first = serve_data_file(&ctx("/data/f.txt"), &site, "f.txt").await;
        let etag = first.headers().get("ETag").unwrap().to_str().unwrap().to_string();

        let mut cached = ctx("/data/f.txt");
        cached.if_none_match = Some(etag);
        let resp = serve_data_file(&cached, &site, "f.txt").await;
        assert_eq!(resp.status(), 304);
    }

    #[tokio::test]
    async fn test_range_request_gives_206() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.bin"), b"0123456789").unwrap();
        let site = site_with_data_dir(dir.path());

        let mut ranged = ctx("/data/f.bin");
        ranged.range_header = Some("bytes=2-5".to_string());
        let resp = serve_data_file(&ranged, &site, "f.bin").await;
        assert_eq!(resp.status(), 206);
        assert_eq!(
            resp.headers().get("Content-Range").unwrap(),
            "bytes 2-5/10"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"2345");
    }
}
