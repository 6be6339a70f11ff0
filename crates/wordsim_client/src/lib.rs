//! Remote variants of the word similarity contracts.
//! `HttpSearcher` proxies a running wsserver, `HttpSyntaxStore` talks to a
//! corpus syntax database service.

pub mod http;
pub mod syntax_db;

pub use http::HttpSearcher;
pub use syntax_db::HttpSyntaxStore;

use std::time::Duration;

use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `base` with `segments` appended as percent-encoded path segments.
/// `None` for URLs that cannot carry a path (e.g. `mailto:`).
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}
