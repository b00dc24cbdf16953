use std::net::TcpListener;

use pretty_assertions::assert_eq;
use wifisend_engine::{Prober, ReqwestProber, TransferSettings, USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn probe_reports_reachable_on_200() {
    transfer_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>WiFi</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = ReqwestProber::new(TransferSettings::default())
        .probe(&server.uri())
        .await;

    assert!(result.reachable);
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.body, "<html>WiFi</html>");
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn probe_reports_unreachable_on_other_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let result = ReqwestProber::default().probe(&server.uri()).await;

    assert!(!result.reachable);
    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.body, "missing");
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn probe_against_closed_port_reports_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = ReqwestProber::default()
        .probe(&format!("http://127.0.0.1:{port}"))
        .await;

    assert!(!result.reachable);
    assert_eq!(result.status_code, None);
    let error = result.error.expect("error populated");
    assert!(error.starts_with("cannot reach the device"), "got {error}");
}
