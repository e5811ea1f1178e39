mod common;

use std::sync::Arc;
use std::time::Duration;

use common::SlowTripService;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use trips::routes::create_router;
use trips::server::{serve, Shutdown};
use trips::state::AppState;
use uuid::Uuid;

struct Running {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<Shutdown>>,
    addr: std::net::SocketAddr,
}

async fn start(delay: Duration, deadline: Duration) -> anyhow::Result<Running> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(AppState::new(Arc::new(SlowTripService { delay })));
    let (stop, stopped) = oneshot::channel::<()>();
    let signal = async move {
        let _ = stopped.await;
    };
    let handle = tokio::spawn(serve(listener, app, signal, deadline));
    Ok(Running { stop, handle, addr })
}

#[tokio::test]
async fn idle_server_drains_on_signal() -> anyhow::Result<()> {
    let running = start(Duration::from_secs(10), Duration::from_secs(5)).await?;

    let _ = running.stop.send(());
    let outcome = tokio::time::timeout(Duration::from_secs(3), running.handle).await???;

    assert_eq!(outcome, Shutdown::Drained);
    Ok(())
}

#[tokio::test]
async fn stuck_request_is_abandoned_after_the_deadline() -> anyhow::Result<()> {
    let running = start(Duration::from_secs(10), Duration::from_millis(200)).await?;

    let mut stream = TcpStream::connect(running.addr).await?;
    let request = format!(
        "GET /trips/{} HTTP/1.1\r\nHost: localhost\r\n\r\n",
        Uuid::new_v4()
    );
    stream.write_all(request.as_bytes()).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let _ = running.stop.send(());
    let outcome = tokio::time::timeout(Duration::from_secs(3), running.handle).await???;

    assert_eq!(outcome, Shutdown::DeadlineElapsed);
    drop(stream);
    Ok(())
}
