//! 表格数据库 REST 适配器

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::store::{FieldMap, RawRecord, RecordStore, ResourceKind, StoreError, TableHandle};
use crate::config::StoreConfig;

/// 基于 REST API 的记录存储
pub struct AirtableStore {
    client: Client,
    config: StoreConfig,
}

impl AirtableStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StoreError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn credentials(&self) -> Option<(String, String)> {
        if !self.config.has_credentials() {
            return None;
        }
        let api_key = self.config.api_key.clone()?;
        let base_id = self.config.base_id.clone()?;
        Some((api_key.trim().to_string(), base_id.trim().to_string()))
    }
}

impl RecordStore for AirtableStore {
    fn is_configured(&self, kind: ResourceKind) -> bool {
        self.config.is_configured(kind)
    }

    fn open_table(&self, kind: ResourceKind) -> Result<Arc<dyn TableHandle>, StoreError> {
        let (api_key, base_id) = self
            .credentials()
            .ok_or_else(|| StoreError::Config("缺少访问密钥或存储标识".to_string()))?;

        let table = self.config.table_name(kind).to_string();
        debug!("打开远程表: {}", table);

        Ok(Arc::new(AirtableTable {
            client: self.client.clone(),
            api_url: self.config.api_url.clone(),
            api_key,
            base_id,
            table,
        }))
    }
}

/// 单张远程表
pub struct AirtableTable {
    client: Client,
    api_url: String,
    api_key: String,
    base_id: String,
    table: String,
}

/// 列表接口的分页结果
#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<RawRecord>,
    offset: Option<String>,
}

impl AirtableTable {
    /// 拼接 `{api}/{base}/{table}[/{id}]`，路径段自动转义
    pub fn record_url(&self, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| StoreError::Config(format!("无效的存储 API 地址 {}: {}", self.api_url, e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Config(format!("无效的存储 API 地址: {}", self.api_url)))?;
            segments.pop_if_empty().push(&self.base_id).push(&self.table);
            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        target: &str,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(target.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Remote(format!("HTTP {}: {}", status, body)));
        }

        Ok(response.json::<T>().await?)
    }

    fn target(&self, id: &str) -> String {
        format!("{}/{}", self.table, id)
    }
}

#[async_trait]
impl TableHandle for AirtableTable {
    async fn find(&self, id: &str) -> Result<RawRecord, StoreError> {
        let response = self
            .client
            .get(self.record_url(Some(id))?)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::decode(response, &self.target(id)).await
    }

    async fn list_all(&self) -> Result<Vec<RawRecord>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let mut request = self
                .client
                .get(self.record_url(None)?)
                .bearer_auth(&self.api_key);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor)]);
            }

            let page: RecordPage = Self::decode(request.send().await?, &self.table).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) if seen.insert(next.clone()) => offset = Some(next),
                Some(next) => {
                    warn!("表 {} 返回了重复的分页游标 {}，停止翻页", self.table, next);
                    break;
                }
                None => break,
            }
        }

        info!("从表 {} 读取 {} 条记录", self.table, records.len());
        Ok(records)
    }

    async fn create(&self, fields: FieldMap) -> Result<RawRecord, StoreError> {
        let response = self
            .client
            .post(self.record_url(None)?)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        Self::decode(response, &self.table).await
    }

    async fn update(&self, id: &str, fields: FieldMap) -> Result<RawRecord, StoreError> {
        let response = self
            .client
            .patch(self.record_url(Some(id))?)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        Self::decode(response, &self.target(id)).await
    }

    async fn destroy(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.record_url(Some(id))?)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response, &self.target(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn configured() -> StoreConfig {
        StoreConfig {
            api_key: Some("keyTest".to_string()),
            base_id: Some("appMarket".to_string()),
            orders_table: Some("Customer Orders".to_string()),
            ..StoreConfig::default()
        }
    }

    fn table(api_url: &str) -> AirtableTable {
        AirtableTable {
            client: Client::new(),
            api_url: api_url.to_string(),
            api_key: "keyTest".to_string(),
            base_id: "appMarket".to_string(),
            table: "Customer Orders".to_string(),
        }
    }

    #[test]
    fn test_open_table_requires_credentials() {
        let store = AirtableStore::new(StoreConfig::default()).unwrap();
        assert!(!store.is_configured(ResourceKind::Products));
        assert!(matches!(
            store.open_table(ResourceKind::Products),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_open_table_uses_default_table_name() {
        let store = AirtableStore::new(configured()).unwrap();
        // 没有商品表覆盖：可以打开表，但降级开关保持关闭
        assert!(store.open_table(ResourceKind::Products).is_ok());
        assert!(!store.is_configured(ResourceKind::Products));
        assert!(store.is_configured(ResourceKind::Orders));
    }

    #[test]
    fn test_record_url_escapes_segments() {
        let url = table("https://api.airtable.com/v0").record_url(Some("rec1")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appMarket/Customer%20Orders/rec1"
        );

        let url = table("http://127.0.0.1:9000/v0/").record_url(None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v0/appMarket/Customer%20Orders");
    }

    #[test]
    fn test_record_url_rejects_bad_base() {
        assert!(matches!(
            table("not a url").record_url(None),
            Err(StoreError::Config(_))
        ));
    }

    /// 本地模拟的列表接口：前两页给出新游标，之后一直回传同一个游标
    async fn serve_pages(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/v0/:base/:table",
            get(move || {
                let hits = hits.clone();
                async move {
                    let page = hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "records": [{ "id": format!("rec{}", page), "fields": {} }],
                        "offset": format!("itr{}", page.min(1)),
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v0")
    }

    #[tokio::test]
    async fn test_list_all_stops_on_repeated_cursor() {
        let hits = Arc::new(AtomicUsize::new(0));
        let records = table(&serve_pages(hits.clone()).await).list_all().await.unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["rec0", "rec1", "rec2"]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_raw_record_decoding() {
        let record: RawRecord = serde_json::from_value(json!({
            "id": "rec123",
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": { "name": "Lamp" }
        }))
        .unwrap();
        assert_eq!(record.id, "rec123");
        assert_eq!(record.created_time.as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(record.fields["name"], "Lamp");
    }
}
