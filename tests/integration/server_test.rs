use clickup_proxy::{AppConfig, ProxyServer, StartupError};

#[tokio::test]
async fn serve_binds_and_shuts_down_cleanly() {
    let mut config = AppConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;

    let server = ProxyServer::new(config).unwrap();
    let result = server.serve(async {}).await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn serve_reports_bind_failures() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let mut config = AppConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = port;

    let server = ProxyServer::new(config).unwrap();
    let err = server.serve(async {}).await.unwrap_err();

    assert!(matches!(err, StartupError::Bind { .. }), "{err}");
}
