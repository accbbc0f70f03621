use crate::Api;
use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, info_span, instrument, Instrument};

/// Serves the console API on `addr` until the runtime begins shutdown.
///
/// Connections in flight when shutdown starts are allowed to finish.
#[instrument(skip_all, fields(port = %addr.port()))]
pub async fn serve(addr: SocketAddr, api: Api, drain: drain::Watch) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "console API server listening");

    let signaled = drain.clone().signaled();
    tokio::pin!(signaled);

    loop {
        let (io, client_addr) = tokio::select! {
            res = listener.accept() => match res {
                Ok(conn) => conn,
                Err(error) => {
                    debug!(%error, "Failed to accept connection");
                    continue;
                }
            },
            _ = &mut signaled => {
                debug!("Stopped accepting connections");
                return Ok(());
            }
        };

        let svc = TowerToHyperService::new(api.clone());
        let drain = drain.clone();
        tokio::spawn(
            async move {
                let conn = http1::Builder::new().serve_connection(TokioIo::new(io), svc);
                tokio::pin!(conn);

                tokio::select! {
                    res = conn.as_mut() => {
                        if let Err(error) = res {
                            debug!(%error, "Connection failed");
                        }
                    }
                    handle = drain.signaled() => {
                        conn.as_mut().graceful_shutdown();
                        if let Err(error) = handle.release_after(conn).await {
                            debug!(%error, "Connection failed during shutdown");
                        }
                    }
                }
            }
            .instrument(info_span!("conn", client.addr = %client_addr)),
        );
    }
}
