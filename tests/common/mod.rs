//! 集成测试公共工具：记录存储替身与服务启动
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use marketplace::app;
use marketplace::config::{Config, ServerConfig};
use marketplace::infrastructure::airtable::AirtableStore;
use marketplace::infrastructure::store::{FieldMap, RawRecord};
use marketplace::{RecordStore, ResourceKind, StoreError, TableHandle};

/// 内存表，按远程 API 的语义实现 PATCH 合并
#[derive(Default)]
pub struct MemoryTable {
    records: Mutex<Vec<RawRecord>>,
    next_id: AtomicUsize,
}

impl MemoryTable {
    pub fn seed(&self, fields: serde_json::Value) -> String {
        let serde_json::Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        let id = format!("rec{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records.lock().unwrap().push(RawRecord {
            id: id.clone(),
            created_time: Some("2024-01-01T00:00:00.000Z".to_string()),
            fields,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, id: &str) -> Option<RawRecord> {
        self.records.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

#[async_trait]
impl TableHandle for MemoryTable {
    async fn find(&self, id: &str) -> Result<RawRecord, StoreError> {
        self.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, fields: FieldMap) -> Result<RawRecord, StoreError> {
        let id = self.seed(serde_json::Value::Object(fields));
        self.find(&id).await
    }

    async fn update(&self, id: &str, fields: FieldMap) -> Result<RawRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.fields.extend(fields);
        Ok(record.clone())
    }

    async fn destroy(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// 已配置的内存存储
#[derive(Default)]
pub struct MemoryStore {
    pub products: Arc<MemoryTable>,
    pub orders: Arc<MemoryTable>,
}

impl RecordStore for MemoryStore {
    fn is_configured(&self, _kind: ResourceKind) -> bool {
        true
    }

    fn open_table(&self, kind: ResourceKind) -> Result<Arc<dyn TableHandle>, StoreError> {
        Ok(match kind {
            ResourceKind::Products => self.products.clone(),
            ResourceKind::Orders => self.orders.clone(),
        })
    }
}

/// 已配置但所有远程调用都失败的存储
#[derive(Default)]
pub struct FailingStore {
    pub calls: Arc<AtomicUsize>,
}

struct FailingTable {
    calls: Arc<AtomicUsize>,
}

impl FailingTable {
    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Remote("connection reset by peer".to_string()))
    }
}

#[async_trait]
impl TableHandle for FailingTable {
    async fn find(&self, _id: &str) -> Result<RawRecord, StoreError> {
        self.fail()
    }
    async fn list_all(&self) -> Result<Vec<RawRecord>, StoreError> {
        self.fail()
    }
    async fn create(&self, _fields: FieldMap) -> Result<RawRecord, StoreError> {
        self.fail()
    }
    async fn update(&self, _id: &str, _fields: FieldMap) -> Result<RawRecord, StoreError> {
        self.fail()
    }
    async fn destroy(&self, _id: &str) -> Result<(), StoreError> {
        self.fail()
    }
}

impl RecordStore for FailingStore {
    fn is_configured(&self, _kind: ResourceKind) -> bool {
        true
    }

    fn open_table(&self, _kind: ResourceKind) -> Result<Arc<dyn TableHandle>, StoreError> {
        Ok(Arc::new(FailingTable {
            calls: self.calls.clone(),
        }))
    }
}

/// 未配置凭据的真实 REST 存储
pub fn unconfigured_store() -> Arc<dyn RecordStore> {
    Arc::new(AirtableStore::new(Config::default().store).unwrap())
}

/// 绑定 0 端口启动服务，返回 `http://addr`
pub async fn start_server(store: Arc<dyn RecordStore>) -> String {
    let app = app::router(store, &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// 一个当前无人监听的地址
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
