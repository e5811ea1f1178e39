use std::{
    future::{Future, IntoFuture},
    io,
    time::Duration,
};

use axum::Router;
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, warn};

/// How [`serve`] came to a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Every in-flight request finished before the deadline.
    Drained,
    /// The deadline passed with requests still running; they were abandoned.
    DeadlineElapsed,
}

/// Serves `app` until `signal` resolves, then gives in-flight requests
/// `deadline` to finish.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    deadline: Duration,
) -> io::Result<Shutdown>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = stop_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map(|()| Shutdown::Drained),
        _ = stop_rx.changed() => {}
    }

    info!(?deadline, "draining in-flight requests");
    match tokio::time::timeout(deadline, &mut server).await {
        Ok(result) => result.map(|()| Shutdown::Drained),
        Err(_) => {
            warn!(?deadline, "shutdown deadline elapsed, abandoning in-flight requests");
            Ok(Shutdown::DeadlineElapsed)
        }
    }
}
