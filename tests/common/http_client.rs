//! Thin reqwest wrapper over the server's endpoints.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use ranker::constants::RANKER_STATUS_HEADER;

#[derive(Debug, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyBody {
    pub status: String,
    pub products: usize,
    pub reference_rows: usize,
    pub num_features: usize,
    pub num_trees: Option<usize>,
    pub encoders: Vec<String>,
    pub join_violations: usize,
    pub artifacts: Vec<Value>,
}

#[derive(Debug)]
pub struct RankReply {
    pub status: u16,
    pub ranker_status: Option<String>,
    pub body: Value,
}

impl RankReply {
    pub fn product_ids(&self) -> Vec<String> {
        self.body["recommendations"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| r["Product_ID"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("build client");
        Self { base_url, client }
    }

    pub async fn health(&self) -> reqwest::Result<HealthBody> {
        self.client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn ready(&self) -> reqwest::Result<ReadyBody> {
        self.client
            .get(format!("{}/ready", self.base_url))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn rank(&self, body: Value) -> reqwest::Result<RankReply> {
        let response = self
            .client
            .post(format!("{}/api/meow", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let ranker_status = response
            .headers()
            .get(RANKER_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.json().await?;

        Ok(RankReply {
            status,
            ranker_status,
            body,
        })
    }
}
