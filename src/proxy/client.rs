use std::time::Duration;

/// Upstream client shared by every request of one [`crate::server::ProxyServer`].
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(timeout)
        .build()
}
