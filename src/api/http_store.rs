//! Implements the `Store` trait against an HTTP endpoint.
//!
//! The endpoint accepts `GET` for fetching everything and `POST` for every mutation, with an
//! `action` field distinguishing update and delete from create.

use crate::api::Store;
use crate::model::{transactions_from_records, RecordId, Transaction, TransactionFields};
use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

pub(crate) struct HttpStore {
    url: Url,
    client: Client,
}

impl HttpStore {
    pub(crate) fn new(url: Url) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { url, client })
    }

    async fn post<B>(&self, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;
        read_json(response).await
    }
}

/// The body of an update request: the action, the id, and the new fields side by side.
#[derive(Serialize)]
struct UpdateRequest<'a> {
    action: &'static str,
    id: &'a RecordId,
    #[serde(flatten)]
    fields: &'a TransactionFields,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    action: &'static str,
    id: &'a RecordId,
}

#[async_trait::async_trait]
impl Store for HttpStore {
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>> {
        trace!("GET {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;
        let body = read_json(response).await?;
        let records = match body {
            Value::Array(records) => records,
            other => bail!("Expected a JSON array of transactions, got: {other}"),
        };
        debug!("Fetched {} records", records.len());
        Ok(transactions_from_records(&records))
    }

    async fn create(&mut self, fields: &TransactionFields) -> Result<Transaction> {
        trace!("POST create {fields:?}");
        let body = self.post(fields).await?;
        Ok(Transaction::from_record(&body))
    }

    async fn update(&mut self, id: &RecordId, fields: &TransactionFields) -> Result<Transaction> {
        trace!("POST update {id} {fields:?}");
        let body = self
            .post(&UpdateRequest {
                action: "update",
                id,
                fields,
            })
            .await?;
        Ok(Transaction::from_record(&body))
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        trace!("POST delete {id}");
        let _ = self
            .post(&DeleteRequest {
                action: "delete",
                id,
            })
            .await?;
        Ok(())
    }
}

async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP error! status: {}", status.as_u16());
    }
    response
        .json()
        .await
        .context("Failed to parse the store response as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Identifiable, TransactionType};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::str::FromStr;

    fn fields() -> TransactionFields {
        crate::model::TransactionForm {
            date: "2024-02-02".into(),
            kind: "expense".into(),
            category: "Food".into(),
            amount: "30".into(),
            note: "snack".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_update_request_shape() {
        let id = RecordId::Number(4);
        let f = fields();
        let body = serde_json::to_value(UpdateRequest {
            action: "update",
            id: &id,
            fields: &f,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "action": "update",
                "id": 4,
                "date": "2024-02-02",
                "type": "expense",
                "category": "Food",
                "amount": 30.0,
                "note": "snack"
            })
        );
        assert_eq!(f.date, NaiveDate::from_str("2024-02-02").unwrap());
    }

    #[test]
    fn test_delete_request_shape() {
        let id = RecordId::Text("abc".into());
        let body = serde_json::to_value(DeleteRequest {
            action: "delete",
            id: &id,
        })
        .unwrap();
        assert_eq!(body, json!({"action": "delete", "id": "abc"}));
    }

    /// Serves a single canned response on a local port and returns the store URL along with a
    /// handle yielding the request line that was received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (Url, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        let url = Url::parse(&format!("http://{addr}/exec")).unwrap();
        (url, handle)
    }

    #[tokio::test]
    async fn test_error_status() {
        let (url, server) = serve_once("500 Internal Server Error", "{}").await;
        let mut store = HttpStore::new(url).unwrap();
        let e = store.fetch_all().await.unwrap_err();
        assert_eq!(e.to_string(), "HTTP error! status: 500");
        assert_eq!(server.await.unwrap(), "GET /exec HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_all_requires_an_array() {
        let (url, _server) = serve_once("200 OK", "{}").await;
        let mut store = HttpStore::new(url).unwrap();
        let e = store.fetch_all().await.unwrap_err();
        assert_eq!(e.to_string(), "Expected a JSON array of transactions, got: {}");
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_records() {
        let body = r#"[
            {"id": 1, "date": "2024-01-29", "type": "expense", "category": "Food", "amount": 50},
            {"row": 7, "date": "2024-02-02", "type": "income", "category": "Gift", "amount": "12.5"}
        ]"#;
        let (url, _server) = serve_once("200 OK", body).await;
        let mut store = HttpStore::new(url).unwrap();
        let txs = store.fetch_all().await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].record_id(), Some(&RecordId::Number(1)));
        assert_eq!(txs[0].kind(), Some(TransactionType::Expense));
        assert_eq!(txs[0].amount().to_string(), "50.00");
        assert_eq!(txs[1].record_id(), Some(&RecordId::Number(7)));
        assert_eq!(txs[1].date(), NaiveDate::from_ymd_opt(2024, 2, 2));
        assert_eq!(txs[1].amount().to_string(), "12.50");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let mut store = HttpStore::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        assert!(store.fetch_all().await.is_err());
    }
}
