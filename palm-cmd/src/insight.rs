//! `insight` subcommand: send the dashboard snapshot to the summarization
//! service and print the returned text.

use crate::config::{DataArgs, ExtensionArgs, InsightArgs};
use crate::dashboard::compute;
use crate::data::load_database;
use anyhow::Context;
use log::info;
use palm_data::{snapshot, InsightSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Output column of the action table.
pub const INSIGHT_COLUMN: &str = "Insight";

#[derive(Serialize)]
struct AddRowsRequest<'a> {
    table_id: &'a str,
    data: [&'a InsightSnapshot; 1],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct AddRowsResponse {
    rows: Vec<RowOutput>,
}

#[derive(Debug, Deserialize)]
struct RowOutput {
    columns: HashMap<String, ColumnOutput>,
}

#[derive(Debug, Deserialize)]
struct ColumnOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

impl ColumnOutput {
    fn into_text(self) -> Option<String> {
        self.text
            .or_else(|| self.choices.into_iter().next().map(|c| c.message.content))
    }
}

fn insight_text(response: AddRowsResponse) -> anyhow::Result<String> {
    response
        .rows
        .into_iter()
        .next()
        .and_then(|mut row| row.columns.remove(INSIGHT_COLUMN))
        .and_then(ColumnOutput::into_text)
        .with_context(|| format!("Response has no {INSIGHT_COLUMN} text"))
}

/// Client for the action-table endpoint that turns one snapshot row into
/// insight text.
pub struct InsightClient {
    client: reqwest::Client,
    url: String,
    project_id: String,
    token: String,
    table_id: String,
}

impl InsightClient {
    pub fn new(args: &InsightArgs) -> anyhow::Result<Self> {
        let project_id = args
            .project_id
            .clone()
            .context("PALM_INSIGHT_PROJECT_ID (or --project-id) is required")?;
        let token = args
            .token
            .clone()
            .context("PALM_INSIGHT_TOKEN (or --token) is required")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(args.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!(
                "{}/api/v1/gen_tables/action/rows/add",
                args.endpoint.trim_end_matches('/')
            ),
            project_id,
            token,
            table_id: args.table_id.clone(),
        })
    }

    /// Post the snapshot and return the generated text. Failures, including
    /// timeouts, are returned as errors and never retried.
    pub async fn generate(&self, snapshot: &InsightSnapshot) -> anyhow::Result<String> {
        let request = AddRowsRequest {
            table_id: &self.table_id,
            data: [snapshot],
            stream: false,
        };
        info!("Requesting insight from {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .header("X-PROJECT-ID", &self.project_id)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Insight request to {} failed", self.url))?
            .error_for_status()?
            .json::<AddRowsResponse>()
            .await
            .context("Insight response was not valid JSON")?;
        insight_text(response)
    }
}

pub async fn run_insight(
    data: &DataArgs,
    extension: ExtensionArgs,
    insight: &InsightArgs,
    year: Option<i32>,
) -> anyhow::Result<()> {
    let snapshot = {
        let db = load_database(data)?;
        let metrics = compute(&db, extension, year)?;
        snapshot(&metrics)?
    };
    let client = InsightClient::new(insight)?;
    let text = client.generate(&snapshot).await?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(endpoint: &str) -> InsightArgs {
        InsightArgs {
            endpoint: endpoint.to_string(),
            project_id: Some("proj_test".to_string()),
            token: Some("pat_test".to_string()),
            table_id: "AI_insights1".to_string(),
            timeout_secs: 2,
        }
    }

    fn sample_snapshot() -> InsightSnapshot {
        InsightSnapshot {
            key_metrics: "{}".to_string(),
            trends: "{}".to_string(),
            monthly: "{}".to_string(),
            climate: "[]".to_string(),
        }
    }

    #[test]
    fn request_body_is_one_row() {
        let snap = sample_snapshot();
        let body = serde_json::to_value(AddRowsRequest {
            table_id: "AI_insights1",
            data: [&snap],
            stream: false,
        })
        .unwrap();
        assert_eq!(body["table_id"], "AI_insights1");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["climate"], "[]");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn insight_text_from_chat_choices() {
        let response: AddRowsResponse = serde_json::from_str(
            r#"{"rows":[{"columns":{"Insight":{"choices":[{"message":{"content":"Yield fell 4%."}}]}}}]}"#,
        )
        .unwrap();
        assert_eq!(insight_text(response).unwrap(), "Yield fell 4%.");
    }

    #[test]
    fn insight_text_missing_column() {
        let response: AddRowsResponse =
            serde_json::from_str(r#"{"rows":[{"columns":{"Other":{"text":"x"}}}]}"#).unwrap();
        assert!(insight_text(response).is_err());
        let empty: AddRowsResponse = serde_json::from_str(r#"{"rows":[]}"#).unwrap();
        assert!(insight_text(empty).is_err());
    }

    #[test]
    fn client_requires_credentials() {
        let mut missing = args("http://127.0.0.1:9");
        missing.token = None;
        assert!(InsightClient::new(&missing).is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let client = InsightClient::new(&args("http://127.0.0.1:9/")).unwrap();
        assert_eq!(
            client.url,
            "http://127.0.0.1:9/api/v1/gen_tables/action/rows/add"
        );
        let err = client.generate(&sample_snapshot()).await.unwrap_err();
        assert!(err.to_string().contains("Insight request"));
    }
}
