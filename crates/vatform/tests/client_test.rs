#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Wire format of the validation request and response.

use std::time::Duration;

use vatform::client::{ValidationClient, VatRequest};
use vatform::{ClientError, HttpValidationClient};
use vatform_test_utils::{MockEndpoint, MockResponse, assert, registry_record};

#[tokio::test]
async fn posts_json_payload() {
    let endpoint = MockEndpoint::start(MockResponse::double_encoded(&registry_record(false, None)))
        .await
        .unwrap();
    let client = HttpValidationClient::new(&endpoint.base_url(), Duration::from_secs(5)).unwrap();
    assert!(client.endpoint().ends_with("/wp-json/vat/validate"));

    client
        .validate(&VatRequest::new("fi", "23319727"))
        .await
        .unwrap();

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert::exact_keys(&request.body, &["countryCode", "vatNumber"]);
    assert_eq!(request.body["countryCode"], "fi");
    assert_eq!(request.body["vatNumber"], "23319727");
}

#[tokio::test]
async fn base_url_with_trailing_slash() {
    let endpoint = MockEndpoint::start(MockResponse::double_encoded(&registry_record(true, Some("Acme Oy"))))
        .await
        .unwrap();
    let base = format!("{}/", endpoint.base_url());
    let client = HttpValidationClient::new(&base, Duration::from_secs(5)).unwrap();

    let result = client
        .validate(&VatRequest::new("fi", "23319727"))
        .await
        .unwrap();
    assert_eq!(result.registered_name(), Some("Acme Oy"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let endpoint = MockEndpoint::start(
        MockResponse::double_encoded(&registry_record(true, Some("Acme Oy"))).with_status(503),
    )
    .await
    .unwrap();
    let client = HttpValidationClient::new(&endpoint.base_url(), Duration::from_secs(5)).unwrap();

    let err = client
        .validate(&VatRequest::new("fi", "23319727"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status(503)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let endpoint = MockEndpoint::start(
        MockResponse::double_encoded(&registry_record(false, None))
            .with_delay(Duration::from_secs(2)),
    )
    .await
    .unwrap();
    let client =
        HttpValidationClient::new(&endpoint.base_url(), Duration::from_millis(100)).unwrap();

    let err = client
        .validate(&VatRequest::new("fi", "23319727"))
        .await
        .unwrap_err();
    let ClientError::Request(inner) = err else {
        panic!("expected a request error");
    };
    assert!(inner.is_timeout());
}
