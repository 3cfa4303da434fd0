//! Page rendering
//!
//! Serves the fixed HTML pages of the site. Template names come from the
//! configured route table, never from request data, so there is no lookup
//! to sanitize here.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Serve a page backed by a template file.
///
/// A missing or unreadable template is a server-side fault and surfaces as a
/// 500; the path only appears in the error log.
pub async fn serve_page(
    ctx: &RequestContext<'_>,
    site: &SiteConfig,
    template: &str,
) -> Response<Full<Bytes>> {
    let path = Path::new(&site.template_dir).join(template);
    match fs::read_to_string(&path).await {
        Ok(html) => http::response::build_html_response(html, ctx.is_head),
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                logger::log_error(&format!("Template not found: {}", path.display()));
            } else {
                logger::log_error(&format!(
                    "Failed to read template '{}': {e}",
                    path.display()
                ));
            }
            http::build_500_response()
        }
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

    fn site_with_template_dir(dir: &std::path::Path) -> SiteConfig {
        SiteConfig {
            template_dir: dir.to_string_lossy().into_owned(),
            ..SiteConfig::default()
        }
    }

    #[tokio::test]
    async fn test_serves_template_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("graph.html"), "<html><body>graph</body></html>").unwrap();
        let site = site_with_template_dir(dir.path());

        let resp = serve_page(&ctx("/"), &site, "graph.html").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<html><body>graph</body></html>");
    }

    #[tokio::test]
    async fn test_missing_template_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with_template_dir(dir.path());

        let resp = serve_page(&ctx("/"), &site, "graph.html").await;
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn test_head_keeps_headers_drops_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p.html"), "<p>hi</p>").unwrap();
        let site = site_with_template_dir(dir.path());

        let mut head_ctx = ctx("/");
        head_ctx.is_head = true;
        let resp = serve_page(&head_ctx, &site, "p.html").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "9");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
