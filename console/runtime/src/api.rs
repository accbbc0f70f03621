use crate::{
    core::{FilterQuery, PaginateQuery, SelectQuery, SortBy},
    k8s,
    metrics::ApiMetrics,
    resources::{self, ConsoleResource, Resources},
    response::{self, Body, Outcome, Reply},
};
use bytes::Bytes;
use futures::future;
use http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde::Deserialize;
use std::{str::FromStr, task};
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

const PREFIX: &str = "/api/k8s/";

/// Serves the console's resource API.
#[derive(Clone, Debug)]
pub struct Api {
    resources: Resources,
    metrics: ApiMetrics,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resource kind addressed by the first path segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Namespaces,
    Nodes,
    Pods,
    Services,
    Deployments,
    ConfigMaps,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Route {
    List(Kind),
    Get(Kind, String),
    Delete(Kind, String),
    Create(Kind),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Rejection {
    NotFound(&'static str),
    MethodNotAllowed,
}

/// Query string parameters. Malformed numbers read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Params {
    filter_name: String,
    page: i64,
    limit: i64,
    namespace: Option<String>,
    sort: String,
}

#[derive(Debug, Deserialize)]
struct CreateNamespace {
    name: String,
}

// === impl Api ===

impl Api {
    pub fn new(resources: Resources, metrics: ApiMetrics) -> Self {
        Self { resources, metrics }
    }

    async fn handle(self, route: Route, params: Params, body: Bytes) -> Result<Outcome, Error> {
        let ns = params.namespace.as_deref();
        let outcome = match route {
            Route::List(kind) => {
                let order = match params.sort.parse::<SortBy>() {
                    Ok(order) => order,
                    Err(error) => return Ok(Err(resources::Error::Invalid(error.to_string()))),
                };
                let query = params.select_query();
                match kind {
                    Kind::Namespaces => self.list::<k8s::Namespace>(ns, query, order).await,
                    Kind::Nodes => self.list::<k8s::Node>(ns, query, order).await,
                    Kind::Pods => self.list::<k8s::Pod>(ns, query, order).await,
                    Kind::Services => self.list::<k8s::Service>(ns, query, order).await,
                    Kind::Deployments => self.list::<k8s::Deployment>(ns, query, order).await,
                    Kind::ConfigMaps => self.list::<k8s::ConfigMap>(ns, query, order).await,
                }?
            }

            Route::Get(kind, name) => match kind {
                Kind::Namespaces => self.get::<k8s::Namespace>(ns, &name).await,
                Kind::Nodes => self.get::<k8s::Node>(ns, &name).await,
                Kind::Pods => self.get::<k8s::Pod>(ns, &name).await,
                Kind::Services => self.get::<k8s::Service>(ns, &name).await,
                Kind::Deployments => self.get::<k8s::Deployment>(ns, &name).await,
                Kind::ConfigMaps => self.get::<k8s::ConfigMap>(ns, &name).await,
            }?,

            Route::Delete(kind, name) => {
                let res = match kind {
                    Kind::Namespaces => self.resources.delete::<k8s::Namespace>(ns, &name).await,
                    Kind::Nodes => self.resources.delete::<k8s::Node>(ns, &name).await,
                    Kind::Pods => self.resources.delete::<k8s::Pod>(ns, &name).await,
                    Kind::Services => self.resources.delete::<k8s::Service>(ns, &name).await,
                    Kind::Deployments => {
                        self.resources.delete::<k8s::Deployment>(ns, &name).await
                    }
                    Kind::ConfigMaps => self.resources.delete::<k8s::ConfigMap>(ns, &name).await,
                };
                res.map(|()| Reply::Done)
            }

            Route::Create(_) => match serde_json::from_slice::<CreateNamespace>(&body) {
                Ok(CreateNamespace { name }) => self
                    .resources
                    .create_namespace(&name)
                    .await
                    .map(|_| Reply::Done),
                Err(error) => {
                    warn!(%error, "Failed to parse request body");
                    Err(resources::Error::Invalid(error.to_string()))
                }
            },
        };
        Ok(outcome)
    }

    async fn list<K: ConsoleResource>(
        &self,
        ns: Option<&str>,
        query: SelectQuery,
        order: SortBy,
    ) -> Result<Outcome, Error> {
        Ok(response::reply(
            self.resources.list::<K>(ns, query, order).await,
        )?)
    }

    async fn get<K: ConsoleResource>(&self, ns: Option<&str>, name: &str) -> Result<Outcome, Error> {
        Ok(response::reply(self.resources.get::<K>(ns, name).await)?)
    }
}

impl<B> tower::Service<Request<B>> for Api
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> task::Poll<Result<(), Error>> {
        task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let route = match Route::parse(req.method(), req.uri().path()) {
            Ok(route) => route,
            Err(rejection) => {
                debug!(method = %req.method(), path = %req.uri().path(), ?rejection);
                return Box::pin(future::ready(
                    rejection.into_response().map_err(Error::from),
                ));
            }
        };
        let params = Params::parse(req.uri().query());

        let (kind, verb) = route.labels();
        let observer = self.metrics.request(kind, verb);
        let span = info_span!("request", %kind, %verb);
        let this = self.clone();
        Box::pin(
            async move {
                let res = async {
                    let body = req
                        .into_body()
                        .collect()
                        .await
                        .map_err(|e| Error::Request(e.into()))?
                        .to_bytes();

                    let outcome = this.handle(route, params, body).await?;
                    if let Err(error) = &outcome {
                        warn!(%error, "Request failed");
                    }
                    let code = response::code(&outcome);
                    Ok::<_, Error>((code, response::from_outcome(outcome)?))
                }
                .await;

                match res {
                    Ok((code, rsp)) => {
                        observer.handled(code);
                        Ok(rsp)
                    }
                    Err(error) => {
                        warn!(%error, "Failed to serve request");
                        observer.handled(StatusCode::INTERNAL_SERVER_ERROR);
                        Err(error)
                    }
                }
            }
            .instrument(span),
        )
    }
}

// === impl Kind ===

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Namespaces => "namespaces",
            Self::Nodes => "nodes",
            Self::Pods => "pods",
            Self::Services => "services",
            Self::Deployments => "deployments",
            Self::ConfigMaps => "configmaps",
        }
    }
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "namespaces" => Ok(Self::Namespaces),
            "nodes" => Ok(Self::Nodes),
            "pods" => Ok(Self::Pods),
            "services" => Ok(Self::Services),
            "deployments" => Ok(Self::Deployments),
            "configmaps" => Ok(Self::ConfigMaps),
            _ => Err(()),
        }
    }
}

// === impl Route ===

impl Route {
    fn parse(method: &Method, path: &str) -> Result<Self, Rejection> {
        let rest = path
            .strip_prefix(PREFIX)
            .ok_or(Rejection::NotFound("route not found"))?;
        let mut segments = rest.trim_end_matches('/').split('/');
        let kind = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or(Rejection::NotFound("route not found"))?
            .parse::<Kind>()
            .map_err(|()| Rejection::NotFound("unknown resource kind"))?;
        let name = match (segments.next(), segments.next()) {
            (None, _) => None,
            (Some(name), None) if !name.is_empty() => Some(name.to_string()),
            _ => return Err(Rejection::NotFound("route not found")),
        };

        match (method, name) {
            (&Method::GET, None) => Ok(Self::List(kind)),
            (&Method::GET, Some(name)) => Ok(Self::Get(kind, name)),
            (&Method::DELETE, Some(name)) => Ok(Self::Delete(kind, name)),
            (&Method::POST, None) if kind == Kind::Namespaces => Ok(Self::Create(kind)),
            _ => Err(Rejection::MethodNotAllowed),
        }
    }

    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::List(kind) => (kind.as_str(), "list"),
            Self::Get(kind, _) => (kind.as_str(), "get"),
            Self::Delete(kind, _) => (kind.as_str(), "delete"),
            Self::Create(kind) => (kind.as_str(), "create"),
        }
    }
}

// === impl Rejection ===

impl Rejection {
    fn into_response(self) -> Result<Response<Body>, serde_json::Error> {
        match self {
            Self::NotFound(msg) => response::rejected(StatusCode::NOT_FOUND, msg),
            Self::MethodNotAllowed => {
                response::rejected(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            }
        }
    }
}

// === impl Params ===

impl Params {
    fn parse(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "filter_name" => params.filter_name = value.into_owned(),
                "page" => params.page = value.trim().parse().unwrap_or(0),
                "limit" => params.limit = value.trim().parse().unwrap_or(0),
                "namespace" if !value.is_empty() => params.namespace = Some(value.into_owned()),
                "sort" => params.sort = value.into_owned(),
                _ => {}
            }
        }
        params
    }

    fn select_query(&self) -> SelectQuery {
        SelectQuery::new(
            FilterQuery::by_name(self.filter_name.clone()),
            PaginateQuery::new(self.limit, self.page),
        )
    }
}
