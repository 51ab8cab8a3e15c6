use crate::command;
use crate::config::Config;
use crate::connection::Connection;
use crate::error::KvResult;
use crate::resp::{RespError, RespValue};
use crate::store::SharedStore;
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_server(store: SharedStore, config: &Config) -> KvResult<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("kvlite server listening on {addr}");

    serve(listener, store, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Accept connections on `listener` until `shutdown` resolves. Each
/// connection gets its own task; tasks already running are left to finish.
pub async fn serve(
    listener: TcpListener,
    store: SharedStore,
    shutdown: impl Future<Output = ()>,
) -> KvResult<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Failed to accept connection: {e}");
                        continue;
                    }
                };
                debug!("New connection from {peer_addr}");

                let store = store.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(Connection::new(stream), store).await {
                        debug!("Connection error from {peer_addr}: {e}");
                    }
                    debug!("Connection closed: {peer_addr}");
                });
            }
            _ = &mut shutdown => {
                info!("Shutting down...");
                return Ok(());
            }
        }
    }
}

/// Run the request/reply loop for one client.
///
/// Returns `Ok(())` when the peer closes cleanly between requests. A decode
/// error gets a best-effort `-ERR Protocol error` reply and ends the loop,
/// since the stream cannot be resynchronized.
pub async fn handle_connection<S>(mut conn: Connection<S>, store: SharedStore) -> KvResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let request = match conn.read_value().await {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(()),
            Err(RespError::Io(e)) => return Err(e.into()),
            Err(e) => {
                let reply = RespValue::error(format!("ERR Protocol error: {e}"));
                let _ = conn.write_value(&reply).await;
                return Err(e.into());
            }
        };

        debug!(client = conn.id, "request {request}");
        let reply = command::execute(request, &store).await;
        conn.write_value(&reply).await?;
    }
}
