use hyper::client::HttpConnector;
use hyper::http::uri::InvalidUri;
use hyper::{Body, Client, Uri};
use std::time::Duration;

const TCP_KEEPALIVE: Duration = Duration::from_secs(10);
const MAX_IDLE_PER_HOST: usize = 100;

/// Plain HTTP client used for all upstream communication
pub type HttpClient = Client<HttpConnector, Body>;

/// Creates a pooled client which gives up connecting after `connect_timeout` (if set)
pub fn build_client(connect_timeout: Option<Duration>) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_keepalive(Some(TCP_KEEPALIVE));
    connector.set_connect_timeout(connect_timeout);

    Client::builder()
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
        .build(connector)
}

/// Joins a base URL and a path into a request URI, tolerating surplus slashes at the seam
pub fn endpoint(base: &str, path: &str) -> Result<Uri, InvalidUri> {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
    .parse()
}
