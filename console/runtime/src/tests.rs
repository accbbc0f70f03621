//! Cluster API fakes shared by the runtime tests.

use crate::{core::DateTime, k8s::Time};
use http::{Method, Request, Response, StatusCode};
use kube::{client::Body, Client};
use serde_json::json;
use tower_test::mock;

pub(crate) type Handle = mock::Handle<Request<Body>, Response<Body>>;

pub(crate) fn mock_client() -> (Client, Handle) {
    let (svc, handle) = mock::pair::<Request<Body>, Response<Body>>();
    (Client::new(svc, "default"), handle)
}

/// Answers the next request sent to the cluster, returning its method and
/// path.
pub(crate) async fn respond(
    handle: &mut Handle,
    status: StatusCode,
    body: serde_json::Value,
) -> (Method, String) {
    let (req, send) = handle
        .next_request()
        .await
        .expect("client must send a request");
    let bytes = serde_json::to_vec(&body).expect("body must serialize");
    send.send_response(
        Response::builder()
            .status(status)
            .body(Body::from(bytes))
            .expect("response must be valid"),
    );
    (req.method().clone(), req.uri().path().to_string())
}

pub(crate) fn mk_ns(name: &str, created: i64) -> serde_json::Value {
    let ts = DateTime::from_timestamp(created, 0).expect("timestamp must be in range");
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "creationTimestamp": Time(ts),
        },
        "status": { "phase": "Active" },
    })
}

pub(crate) fn status(code: StatusCode, reason: &str, message: &str) -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": if code.is_success() { "Success" } else { "Failure" },
        "message": message,
        "reason": reason,
        "code": code.as_u16(),
    })
}
