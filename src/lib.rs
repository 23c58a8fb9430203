//! # 商品交易市场服务
//!
//! 提供商品目录、订单下单以及对远程表格数据库的容错访问：
//! - 应用层：商品、订单的处理器与业务服务
//! - 核心层：统一错误处理、请求日志中间件、降级策略
//! - 基础设施层：远程记录存储适配器、日志初始化
//! - 客户端：带本地降级的 HTTP 数据访问封装

pub mod app;
pub mod client;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::order::model::{Order, OrderInput, OrderPatch, OrderStatus};
pub use app::product::model::{Product, ProductInput};
pub use client::{ClientError, MarketplaceClient};
pub use config::{Config, ConfigError};
pub use infrastructure::store::{RecordStore, ResourceKind, StoreError, TableHandle};
