//! 核心错误处理模块

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use validator::ValidationErrors;

/// 核心错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CoreError {
    /// 把校验错误折叠成面向用户的提示
    ///
    /// 必填项缺失时统一返回 `required_message`，其它规则返回各自的提示。
    pub fn from_validation(errors: ValidationErrors, required_message: &str) -> Self {
        let field_errors = errors.field_errors();
        let missing = field_errors
            .values()
            .flat_map(|errs| errs.iter())
            .any(|e| e.code == "required" || e.code == "length");
        if missing {
            return CoreError::BadRequest(required_message.to_string());
        }

        let messages: Vec<String> = field_errors
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| "Validation error".to_string())
            })
            .collect();

        CoreError::BadRequest(messages.join(", "))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CoreError::BadRequest(msg)
            | CoreError::NotFound(msg)
            | CoreError::InternalServerError(msg) => msg,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status().as_u16(), self.message())
    }
}

impl std::error::Error for CoreError {}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status().is_server_error() {
            error!("读取请求体失败: {}", rejection.body_text());
            CoreError::InternalServerError("Failed to read request body".to_string())
        } else {
            CoreError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("内部错误: {}", self.message());
        }

        let error_response = ErrorResponse {
            error: self.message().to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
