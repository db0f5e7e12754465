//! In-process server bound to an ephemeral port.

use std::net::SocketAddr;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use ranker::artifacts;
use ranker::gateway::{HandlerState, create_router_with_state};

use super::fixtures;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub dataset: &'static str,
    pub max_top_k: usize,
    pub num_iteration: Option<usize>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            dataset: fixtures::DATASET,
            max_top_k: 1000,
            num_iteration: None,
        }
    }
}

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    _artifacts: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let dir = fixtures::artifact_dir_with(config.dataset);
    let server_config = ranker::config::Config {
        num_iteration: config.num_iteration,
        max_top_k: config.max_top_k,
        ..fixtures::config_for(&dir)
    };
    server_config.validate()?;

    let loaded = artifacts::load(&server_config)?;
    let app = create_router_with_state(HandlerState::new(loaded, server_config.max_top_k));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        addr,
        handle,
        _artifacts: dir,
    })
}
