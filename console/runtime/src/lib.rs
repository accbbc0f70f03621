#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod api;
mod args;
mod metrics;
pub mod resources;
pub mod response;
mod serve;

#[cfg(test)]
mod tests;

pub use self::{
    api::{Api, Kind},
    args::Args,
    metrics::ApiMetrics,
    resources::{ConsoleResource, Resources},
    serve::serve,
};
pub use kubemanage_console_core as core;
pub use kubemanage_console_k8s_api as k8s;
