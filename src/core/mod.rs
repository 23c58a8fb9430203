//! 核心层：错误、响应、中间件与降级策略

pub mod error;
pub mod fallback;
pub mod middleware;
pub mod response;
