//! HTTP connector tests against a mock management API.

use secrecy::SecretString;
use serde_json::{Value, json};
use spaceq::collection::Collection;
use spaceq::config::ClientOptions;
use spaceq::engine::classify::parse_status;
use spaceq::model::ItemFailure;
use spaceq::remote::{ApiRequest, EntityAction, HttpConnector, SpaceApi, SpaceCommand, SpaceConnector};
use spaceq::{Client, Error};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_PATH: &str = "/spaces/s1/environments/master";

fn connector(server: &MockServer) -> HttpConnector {
    HttpConnector::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "s1",
        "master",
        SecretString::from("token".to_string()),
    )
}

fn options() -> ClientOptions {
    let mut options = ClientOptions::default().progress(false).retries(2);
    options.retry.min_timeout_ms = 0;
    options
}

async fn mount_space(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sys": {"id": "s1"}})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn connect_then_create_entry_sends_management_headers() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("POST"))
        .and(path(format!("{ENV_PATH}/entries")))
        .and(header("X-Contentful-Content-Type", "post"))
        .and(header(
            "content-type",
            "application/vnd.contentful.management.v1+json",
        ))
        .and(body_json(json!({"fields": {"title": {"en-US": "Hello"}}})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"sys": {"id": "e1", "version": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = connector(&server).connect().await.unwrap();
    assert_eq!(api.base_url(), format!("{}{ENV_PATH}", server.uri()));

    let command = SpaceCommand::CreateEntry {
        content_type_id: "post".to_string(),
    };
    let request = command
        .request(&json!({"fields": {"title": {"en-US": "Hello"}}}))
        .unwrap();
    let created = api.send(request).await.unwrap();
    assert_eq!(created["sys"]["id"], "e1");
}

#[tokio::test]
async fn not_found_is_classified_and_not_retried() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/entries/gone/published")))
        .and(header("X-Contentful-Version", "4"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "sys": {"type": "Error", "id": "NotFound"},
            "message": "The resource could not be found.",
            "details": {"type": "Entry", "id": "gone"},
            "requestId": "req-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(connector(&server), options());
    let entity = json!({"sys": {"type": "Entry", "id": "gone", "version": 4}});
    let err = client
        .queue_over_collection(EntityAction::Publish, Collection::Array(vec![entity]))
        .await
        .unwrap_err();

    let Some(ItemFailure::Classified(classified)) = err.item_failure() else {
        panic!("expected a classified failure, got {err:?}");
    };
    assert_eq!(classified.kind, "NotFound");
    assert_eq!(classified.status, Some(404));
    assert_eq!(classified.status_text, Some(json!("Not Found")));
    assert_eq!(classified.message, Some(json!("The resource could not be found.")));
    assert_eq!(classified.details, Some(json!({"type": "Entry", "id": "gone"})));
}

#[tokio::test]
async fn bodiless_client_error_has_no_message_or_details() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ENV_PATH}/entries/locked")))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let client = Client::new(connector(&server), options());
    let entity = json!({"sys": {"type": "Entry", "id": "locked"}});
    let err = client
        .queue_over_collection(EntityAction::Delete, Collection::Array(vec![entity]))
        .await
        .unwrap_err();

    let Some(ItemFailure::Classified(classified)) = err.item_failure() else {
        panic!("expected a classified failure, got {err:?}");
    };
    assert_eq!(classified.status, Some(409));
    assert_eq!(classified.message, None);
    assert_eq!(classified.details, None);
    assert_eq!(
        classified.to_message(),
        "{\n  \"status\": 409,\n  \"statusText\": \"Conflict\"\n}"
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ENV_PATH}/assets/a1/published")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ENV_PATH}/assets/a1/published")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sys": {"id": "a1"}})))
        .mount(&server)
        .await;

    let client = Client::new(connector(&server), options());
    let asset = json!({"sys": {"type": "Asset", "id": "a1", "version": 2}});
    let results = client
        .queue_over_collection(EntityAction::Unpublish, Collection::Array(vec![asset]))
        .await
        .unwrap();

    assert_eq!(results, vec![json!({"sys": {"id": "a1"}})]);
    let unpublish_calls = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .count();
    assert_eq!(unpublish_calls, 2);
}

#[tokio::test]
async fn exhausted_server_errors_surface_raw() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ENV_PATH}/entries/e1")))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = Client::new(connector(&server), options());
    let entry = json!({"sys": {"type": "Entry", "id": "e1"}});
    let err = client
        .queue_over_collection(EntityAction::Delete, Collection::Array(vec![entry]))
        .await
        .unwrap_err();

    match err.item_failure() {
        Some(ItemFailure::Raw(raw)) => {
            assert_eq!(raw.name, "InternalServerError");
            assert_eq!(parse_status(&raw.message), Some(500));
        }
        other => panic!("expected a raw failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    mount_space(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ENV_PATH}/entries/e1")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = connector(&server).connect().await.unwrap();
    let value = api.send(ApiRequest::delete("entries/e1")).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn rejected_connect_is_a_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "sys": {"type": "Error", "id": "AccessTokenInvalid"},
            "message": "The access token you sent could not be found or is invalid.",
        })))
        .mount(&server)
        .await;

    let client = Client::new(connector(&server), options());
    let err = client
        .with_space(|_space| async { Ok::<_, Error>(()) })
        .await
        .unwrap_err();

    let Error::Remote(remote) = err else {
        panic!("expected a remote error, got {err:?}");
    };
    assert_eq!(remote.name, "AccessTokenInvalid");
    assert_eq!(parse_status(&remote.message), Some(401));
}
