use crate::{
    core::{select, ConversionError, SelectQuery, Selection, SortBy},
    k8s::{self, KubeCells, ObjectMeta},
};
use http::StatusCode;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{Api, DeleteParams, ListParams, PostParams},
    Client, Resource,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, future::Future};
use thiserror::Error;
use tokio::time::{self, Duration};
use tracing::{debug, info, instrument};

/// Namespace used for single-object operations on namespaced kinds when the
/// caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A handle on the cluster used to serve console requests.
///
/// Each call fetches a fresh snapshot; nothing is cached between calls.
#[derive(Clone)]
pub struct Resources {
    client: Client,
    write_timeout: Duration,
}

/// A resource kind the console can address.
pub trait ConsoleResource:
    Resource<DynamicType = ()>
    + Clone
    + DeserializeOwned
    + Serialize
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    const NAMESPACED: bool;

    /// An API handle scoped to `namespace`, or to every namespace when
    /// `None`. Cluster-scoped kinds ignore the namespace.
    fn api(client: Client, namespace: Option<&str>) -> Api<Self>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: String, name: String },

    #[error("{kind} {name:?} already exists")]
    AlreadyExists { kind: String, name: String },

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("cluster request timed out after {0:?}")]
    Timeout(Duration),

    #[error("cluster request failed: {0}")]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

// === impl Resources ===

impl Resources {
    pub fn new(client: Client, write_timeout: Duration) -> Self {
        Self {
            client,
            write_timeout,
        }
    }

    /// Lists one kind and selects a page of it.
    #[instrument(skip(self, query), fields(kind = %K::kind(&())))]
    pub async fn list<K: ConsoleResource>(
        &self,
        namespace: Option<&str>,
        query: SelectQuery,
        order: SortBy,
    ) -> Result<Selection<K>, Error> {
        let list = K::api(self.client.clone(), namespace)
            .list(&ListParams::default())
            .await?;
        debug!(items = list.items.len(), "Fetched snapshot");

        let selection = select::select(&KubeCells::<K>::new(), list.items, query, order)?;
        debug!(
            total = selection.total,
            items = selection.items.len(),
            "Selected"
        );
        Ok(selection)
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn get<K: ConsoleResource>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<K, Error> {
        let api = K::api(self.client.clone(), object_namespace::<K>(namespace));
        api.get_opt(name)
            .await?
            .ok_or_else(|| Error::NotFound {
                kind: K::kind(&()).into_owned(),
                name: name.to_string(),
            })
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn delete<K: ConsoleResource>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<(), Error> {
        let api = K::api(self.client.clone(), object_namespace::<K>(namespace));
        self.write::<K, _>(name, api.delete(name, &DeleteParams::default()))
            .await?;
        info!(%name, "Deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_namespace(&self, name: &str) -> Result<k8s::Namespace, Error> {
        if name.trim().is_empty() {
            return Err(Error::Invalid("namespace name must not be empty".to_string()));
        }

        let ns = k8s::Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let api = k8s::Namespace::api(self.client.clone(), None);
        let created = self
            .write::<k8s::Namespace, _>(name, api.create(&PostParams::default(), &ns))
            .await?;
        info!(%name, "Created namespace");
        Ok(created)
    }

    /// Bounds a write by the configured timeout and classifies API errors.
    async fn write<K, T>(
        &self,
        name: &str,
        request: impl Future<Output = kube::Result<T>>,
    ) -> Result<T, Error>
    where
        K: ConsoleResource,
    {
        match time::timeout(self.write_timeout, request).await {
            Ok(Ok(rsp)) => Ok(rsp),
            Ok(Err(error)) => Err(Error::from_kube::<K>(error, name)),
            Err(_) => Err(Error::Timeout(self.write_timeout)),
        }
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("write_timeout", &self.write_timeout)
            .finish_non_exhaustive()
    }
}

fn object_namespace<K: ConsoleResource>(namespace: Option<&str>) -> Option<&str> {
    if K::NAMESPACED {
        Some(namespace.unwrap_or(DEFAULT_NAMESPACE))
    } else {
        None
    }
}

fn namespaced_api<K>(client: Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}

// === impl Error ===

impl Error {
    fn from_kube<K: ConsoleResource>(error: kube::Error, name: &str) -> Self {
        let kind = K::kind(&()).into_owned();
        let name = name.to_string();
        match error {
            kube::Error::Api(rsp) if rsp.code == StatusCode::NOT_FOUND.as_u16() => {
                Self::NotFound { kind, name }
            }
            kube::Error::Api(rsp) if rsp.code == StatusCode::CONFLICT.as_u16() => {
                Self::AlreadyExists { kind, name }
            }
            kube::Error::Api(rsp)
                if rsp.code == StatusCode::BAD_REQUEST.as_u16()
                    || rsp.code == StatusCode::UNPROCESSABLE_ENTITY.as_u16() =>
            {
                Self::Invalid(rsp.message)
            }
            error => Self::Kube(error),
        }
    }

    /// The code reported to the dashboard for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Kube(kube::Error::Api(rsp)) if rsp.code == StatusCode::NOT_FOUND.as_u16() => {
                StatusCode::NOT_FOUND
            }
            Self::Timeout(_) | Self::Kube(_) | Self::Conversion(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// === impl ConsoleResource ===

impl ConsoleResource for k8s::Namespace {
    const NAMESPACED: bool = false;

    fn api(client: Client, _namespace: Option<&str>) -> Api<Self> {
        Api::all(client)
    }
}

impl ConsoleResource for k8s::Node {
    const NAMESPACED: bool = false;

    fn api(client: Client, _namespace: Option<&str>) -> Api<Self> {
        Api::all(client)
    }
}

impl ConsoleResource for k8s::Pod {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        namespaced_api(client, namespace)
    }
}

impl ConsoleResource for k8s::Service {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        namespaced_api(client, namespace)
    }
}

impl ConsoleResource for k8s::Deployment {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        namespaced_api(client, namespace)
    }
}

impl ConsoleResource for k8s::ConfigMap {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        namespaced_api(client, namespace)
    }
}
