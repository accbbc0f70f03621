#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod dynamic;

pub use self::{
    cell::{KubeCells, ResourceCell},
    dynamic::{DynamicCell, DynamicCells},
};
pub use k8s_openapi::{
    api::{
        self,
        apps::v1::Deployment,
        core::v1::{ConfigMap, Namespace, Node, Pod, Service},
    },
    apimachinery::{
        self,
        pkg::apis::meta::v1::{ObjectMeta, Time},
    },
};
pub use kube::{
    core::{ApiResource, DynamicObject, TypeMeta},
    Resource, ResourceExt,
};
pub use kubemanage_console_core as core;
