//! 核心响应处理模块

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

/// 删除等无返回实体的操作结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 201 Created 响应
pub fn created<T>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
