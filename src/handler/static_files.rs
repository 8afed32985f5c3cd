//! Static file serving module
//!
//! Maps a URL path to a file under the site root and builds the response.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

/// Serve `ctx.path` from the site root, 404 if absent
pub async fn serve_site(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    match load_site_file(site, ctx.path).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Relative file path for a request path
///
/// The path is percent-decoded first. `""` and `/` map to the entry document.
/// Returns `None` for invalid UTF-8 and for any segment starting with `.`,
/// which covers dotfiles such as `.env` as well as `..`.
fn relative_path<'a>(path: &'a str, index_file: &'a str) -> Option<Cow<'a, str>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let relative = match decoded {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim_start_matches('/')),
        Cow::Owned(s) => Cow::Owned(s.trim_start_matches('/').to_string()),
    };

    if relative.is_empty() {
        return Some(Cow::Borrowed(index_file));
    }
    if relative.split('/').any(|segment| segment.starts_with('.')) {
        return None;
    }
    Some(relative)
}

/// Whether `file` is one of the protected paths, compared without extension
///
/// Protected entries are `config::File::with_name` style paths, so
/// `config` covers `config.toml`, `config.json` and friends.
async fn is_protected(file: &Path, protected: &[PathBuf]) -> bool {
    let stem = file.with_extension("");
    for path in protected {
        let Some(name) = path.file_name() else {
            continue;
        };
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if let Ok(dir) = fs::canonicalize(parent).await {
            if dir.join(name) == stem {
                return true;
            }
        }
    }
    false
}

/// Load a file under the site root
///
/// Refuses directories, dotfiles, protected files and anything outside the root.
pub async fn load_site_file(site: &SiteConfig, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let root = site.root.as_str();
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    let Some(relative) = relative_path(path, &site.index_file) else {
        logger::log_warning(&format!("Refused request path: {path}"));
        return None;
    };
    let file_path: PathBuf = Path::new(root).join(relative.as_ref());

    // Missing files are an ordinary 404, not worth a warning
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return None;
    }

    if is_protected(&file_canonical, &site.protected).await {
        logger::log_warning(&format!("Refused protected file: {path}"));
        return None;
    }

    if !fs::metadata(&file_canonical).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Cipher</h1>").unwrap();
        std::fs::write(dir.path().join("styles.css"), "body{}").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/logo.svg"), "<svg/>").unwrap();
        dir
    }

    fn site_config(root: &Path) -> SiteConfig {
        SiteConfig {
            root: root.to_str().unwrap().to_string(),
            index_file: "index.html".to_string(),
            protected: Vec::new(),
        }
    }

    #[test]
    fn test_relative_path() {
        let rel = |p| relative_path(p, "index.html").map(Cow::into_owned);
        assert_eq!(rel("").as_deref(), Some("index.html"));
        assert_eq!(rel("/").as_deref(), Some("index.html"));
        assert_eq!(rel("/script.js").as_deref(), Some("script.js"));
        assert_eq!(rel("/a/b.png").as_deref(), Some("a/b.png"));
        assert_eq!(rel("/my%20photo.png").as_deref(), Some("my photo.png"));
        assert_eq!(rel("/caf%C3%A9.jpg").as_deref(), Some("café.jpg"));
    }

    #[test]
    fn test_relative_path_refusals() {
        for path in [
            "/.env",
            "/.git/config",
            "/assets/.hidden",
            "/../secret.txt",
            "/%2e%2e/secret.txt",
            "/%2eenv",
            "/bad%FF.png",
        ] {
            assert!(relative_path(path, "index.html").is_none(), "path: {path}");
        }
    }

    #[tokio::test]
    async fn test_root_serves_entry_document() {
        let dir = site_dir();
        let site = site_config(dir.path());
        let (content, content_type) = load_site_file(&site, "/").await.unwrap();
        assert_eq!(content, b"<h1>Cipher</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");

        let (content, _) = load_site_file(&site, "").await.unwrap();
        assert_eq!(content, b"<h1>Cipher</h1>");
    }

    #[tokio::test]
    async fn test_named_and_nested_files() {
        let dir = site_dir();
        let site = site_config(dir.path());
        let (content, content_type) = load_site_file(&site, "/styles.css").await.unwrap();
        assert_eq!(content, b"body{}");
        assert_eq!(content_type, "text/css; charset=utf-8");

        let (_, content_type) = load_site_file(&site, "/assets/logo.svg").await.unwrap();
        assert_eq!(content_type, "image/svg+xml");
    }

    #[tokio::test]
    async fn test_encoded_names_are_served() {
        let dir = site_dir();
        std::fs::write(dir.path().join("my photo.png"), "png").unwrap();
        let site = site_config(dir.path());

        let (content, content_type) = load_site_file(&site, "/my%20photo.png").await.unwrap();
        assert_eq!(content, b"png");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_missing_file_and_directory() {
        let dir = site_dir();
        let site = site_config(dir.path());
        assert!(load_site_file(&site, "/nope.js").await.is_none());
        assert!(load_site_file(&site, "/assets").await.is_none());
        assert!(load_site_file(&site, "/assets/").await.is_none());
    }

    #[tokio::test]
    async fn test_dotfiles_are_refused() {
        let dir = site_dir();
        std::fs::write(dir.path().join(".env"), "OPENAI_API_KEY=sk-live-secret").unwrap();
        let site = site_config(dir.path());
        assert!(load_site_file(&site, "/.env").await.is_none());
        assert!(load_site_file(&site, "/%2Eenv").await.is_none());
    }

    #[tokio::test]
    async fn test_config_file_is_refused() {
        let dir = site_dir();
        std::fs::write(
            dir.path().join("config.toml"),
            "[chat]\napi_key = \"sk-live-secret\"\n",
        )
        .unwrap();
        let mut site = site_config(dir.path());
        assert!(load_site_file(&site, "/config.toml").await.is_some());

        site.protected = vec![dir.path().join("config")];
        assert!(load_site_file(&site, "/config.toml").await.is_none());
        assert!(load_site_file(&site, "/styles.css").await.is_some());
    }

    #[tokio::test]
    async fn test_traversal_is_refused() {
        let outer = tempfile::tempdir().unwrap();
        let site_root = outer.path().join("site");
        std::fs::create_dir(&site_root).unwrap();
        std::fs::write(site_root.join("index.html"), "ok").unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();

        let site = site_config(&site_root);
        assert!(load_site_file(&site, "/../secret.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_root() {
        let site = site_config(Path::new("/definitely/not/a/site/root"));
        assert!(load_site_file(&site, "/").await.is_none());
    }

    #[test]
    fn test_etag_revalidation() {
        let data = b"body{}".to_vec();
        let etag = cache::generate_etag(&data);
        let response = build_static_file_response(data.clone(), "text/css", Some(&etag), false);
        assert_eq!(response.status(), 304);

        let response = build_static_file_response(data, "text/css", Some("\"stale\""), false);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["ETag"], etag.as_str());
    }
}
