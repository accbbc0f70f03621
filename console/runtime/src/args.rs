use crate::{serve, Api, ApiMetrics, Resources};
use anyhow::{bail, Result};
use clap::Parser;
use prometheus_client::registry::Registry;
use std::net::SocketAddr;
use tokio::time::Duration;
use tracing::{info_span, Instrument};

#[derive(Debug, Parser)]
#[clap(name = "console", about = "A Kubernetes management console backend")]
pub struct Args {
    #[clap(
        long,
        default_value = "kubemanage=info,warn",
        env = "KUBEMANAGE_CONSOLE_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    #[clap(long, default_value = "0.0.0.0:9090")]
    api_addr: SocketAddr,

    /// Bounds create and delete requests sent to the cluster.
    #[clap(long, default_value = "10000")]
    write_timeout_ms: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            admin,
            api_addr,
            write_timeout_ms,
        } = self;

        let mut prom = <Registry>::default();
        let api_metrics = ApiMetrics::register(prom.sub_registry_with_prefix("kubemanage_api"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await?;

        let resources = Resources::new(
            runtime.client(),
            Duration::from_millis(write_timeout_ms),
        );
        let api = Api::new(resources, api_metrics);
        tokio::spawn(
            serve(api_addr, api, runtime.shutdown_handle()).instrument(info_span!("api")),
        );

        // Block the main thread on the shutdown signal. Once it fires, wait for in-flight
        // requests to complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
