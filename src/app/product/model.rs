//! 商品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::CoreError;

/// 必填项缺失时的提示
pub const PRODUCT_REQUIRED_MESSAGE: &str = "Name, price, and seller are required";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// 为空时由展示层使用占位图
    #[serde(default)]
    pub image_url: String,
    pub seller: String,
}

/// 创建或整体更新商品的请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(required, range(min = 0.0, message = "Price must be a non-negative number"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

impl ProductInput {
    /// 校验必填字段，失败时返回 400
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::from_validation(errors, PRODUCT_REQUIRED_MESSAGE))
    }
}

impl Product {
    /// 由请求直接构造商品，可选字段取空字符串
    pub fn from_input(id: impl Into<String>, input: &ProductInput) -> Self {
        Self {
            id: id.into(),
            name: input.name.clone().unwrap_or_default(),
            description: input.description.clone().unwrap_or_default(),
            price: input.price.unwrap_or_default(),
            image_url: input.image_url.clone().unwrap_or_default(),
            seller: input.seller.clone().unwrap_or_default(),
        }
    }

    /// 把请求中提供的字段覆盖到当前商品上
    pub fn merged(mut self, input: &ProductInput) -> Self {
        if let Some(name) = &input.name {
            self.name = name.clone();
        }
        if let Some(description) = &input.description {
            self.description = description.clone();
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(image_url) = &input.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(seller) = &input.seller {
            self.seller = seller.clone();
        }
        self
    }
}
