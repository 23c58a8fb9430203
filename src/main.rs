//! 商品交易市场 HTTP 服务

use std::sync::Arc;

use marketplace::app;
use marketplace::config::load_config;
use marketplace::infrastructure::{airtable::AirtableStore, logger::Logger};
use marketplace::{RecordStore, ResourceKind};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config()?;
    Logger::init(&config.logging);

    match &source {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let store = AirtableStore::new(config.store.clone())?;
    for kind in [ResourceKind::Products, ResourceKind::Orders] {
        if store.is_configured(kind) {
            info!("{} 使用远程表: {}", kind, config.store.table_name(kind));
        } else {
            warn!("{} 的远程存储配置不完整，将返回模拟数据", kind);
        }
    }

    let store: Arc<dyn RecordStore> = Arc::new(store);
    let app = app::router(store, &config.server);

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;

    info!("🚀 商品交易市场服务运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /api/products      - 获取所有商品");
    info!("   POST   /api/products      - 创建新商品");
    info!("   GET    /api/products/:id  - 获取特定商品");
    info!("   PUT    /api/products/:id  - 更新商品");
    info!("   DELETE /api/products/:id  - 删除商品");
    info!("   GET    /api/orders        - 获取所有订单");
    info!("   POST   /api/orders        - 下单");
    info!("   GET    /api/orders/:id    - 获取特定订单");
    info!("   PUT    /api/orders/:id    - 更新订单");
    info!("   GET    /health            - 健康检查");

    axum::serve(listener, app).await?;
    Ok(())
}
