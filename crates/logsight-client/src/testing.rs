//! Test utilities for logsight-client
//!
//! Runs a router on an ephemeral local port with a client already pointed at
//! it.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::{LogsightClient, Result};

/// A test server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: LogsightClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on 127.0.0.1 with short client timeouts
    ///
    /// ```ignore
    /// use logsight_api::{create_router, AppState};
    /// use logsight_client::testing::TestServer;
    ///
    /// let server = TestServer::start(create_router(AppState::local())).await?;
    /// let entries = server.client.upload("[t] INFO: hello\n").await?;
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    pub async fn start_with_timeout(
        router: axum::Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let url = format!("http://{}", addr);
        let client = LogsightClient::with_config(&url, timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> &LogsightClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
