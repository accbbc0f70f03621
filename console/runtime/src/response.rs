//! The JSON envelope shared by every console response.
//!
//! Requests the console handles are answered with HTTP 200 and carry their
//! outcome in `code`, which the dashboard inspects. Requests that match no
//! route keep the HTTP status in both places.

use crate::resources;
use http::{header, StatusCode};
use hyper::Response;
use serde::{Deserialize, Serialize};

pub type Body = http_body_util::Full<bytes::Bytes>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub msg: String,
    pub real_err: String,
    pub data: T,
}

/// What a handled request produced.
#[derive(Debug)]
pub(crate) enum Reply {
    Data(serde_json::Value),
    Done,
}

pub(crate) type Outcome = Result<Reply, resources::Error>;

pub(crate) fn reply<T: Serialize>(
    res: Result<T, resources::Error>,
) -> Result<Outcome, serde_json::Error> {
    match res {
        Ok(data) => Ok(Ok(Reply::Data(serde_json::to_value(data)?))),
        Err(error) => Ok(Err(error)),
    }
}

pub(crate) fn code(outcome: &Outcome) -> StatusCode {
    match outcome {
        Ok(_) => StatusCode::OK,
        Err(error) => error.status(),
    }
}

pub(crate) fn from_outcome(outcome: Outcome) -> Result<Response<Body>, serde_json::Error> {
    let envelope = match outcome {
        Ok(Reply::Data(data)) => Envelope {
            code: StatusCode::OK.as_u16(),
            msg: String::new(),
            real_err: String::new(),
            data,
        },
        Ok(Reply::Done) => Envelope {
            code: StatusCode::OK.as_u16(),
            msg: "ok".to_string(),
            real_err: String::new(),
            data: serde_json::Value::String(String::new()),
        },
        Err(error) => Envelope {
            code: error.status().as_u16(),
            msg: summary(&error).to_string(),
            real_err: error.to_string(),
            data: serde_json::Value::String(String::new()),
        },
    };
    json(StatusCode::OK, &envelope)
}

/// An envelope for requests rejected before reaching a handler.
pub(crate) fn rejected(
    status: StatusCode,
    msg: &str,
) -> Result<Response<Body>, serde_json::Error> {
    let envelope = Envelope {
        code: status.as_u16(),
        msg: msg.to_string(),
        real_err: String::new(),
        data: "",
    };
    json(status, &envelope)
}

fn summary(error: &resources::Error) -> &'static str {
    match error {
        resources::Error::NotFound { .. } => "resource not found",
        resources::Error::AlreadyExists { .. } => "resource already exists",
        resources::Error::Invalid(_) => "invalid request",
        resources::Error::Kube(kube::Error::Api(rsp))
            if rsp.code == StatusCode::NOT_FOUND.as_u16() =>
        {
            "resource not found"
        }
        resources::Error::Timeout(_) => "cluster request timed out",
        resources::Error::Kube(_) => "cluster request failed",
        resources::Error::Conversion(_) => "failed to convert resources",
    }
}

fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, serde_json::Error> {
    let bytes = serde_json::to_vec(body)?;
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("json response must be valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;

    async fn envelope(rsp: Response<Body>) -> Envelope<serde_json::Value> {
        let bytes = rsp
            .into_body()
            .collect()
            .await
            .expect("body must be readable")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body must be an envelope")
    }

    #[tokio::test]
    async fn api_not_found_reads_as_missing_resource() {
        let error = resources::Error::Kube(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "nodes \"node-a\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        }));
        assert_eq!(error.status(), StatusCode::NOT_FOUND);

        let rsp = from_outcome(Err(error)).expect("envelope must encode");
        assert_eq!(rsp.status(), StatusCode::OK);
        let envelope = envelope(rsp).await;
        assert_eq!(envelope.code, 404);
        assert_eq!(envelope.msg, "resource not found");
    }

    #[tokio::test]
    async fn other_api_errors_read_as_cluster_failures() {
        let error = resources::Error::Kube(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "etcdserver: request timed out".to_string(),
            reason: "InternalError".to_string(),
            code: 500,
        }));

        let envelope = envelope(from_outcome(Err(error)).expect("envelope must encode")).await;
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.msg, "cluster request failed");
    }
}
