//! 订单数据模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::core::error::CoreError;

/// 必填项缺失时的提示
pub const ORDER_REQUIRED_MESSAGE: &str =
    "Product ID, buyer name, email, and shipping address are required";

/// 订单状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("未知的订单状态: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub product_id: String,
    /// 下单时的商品名称快照
    #[serde(default)]
    pub product_name: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub shipping_address: String,
    pub quantity: u32,
    /// 由调用方按 `price * quantity` 计算，服务端不校验
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: String,
}

/// 下单请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// 订单部分更新，通常只修改 `status`
///
/// 不含 `productId`：商品引用在下单时确定，之后不再变化，请求体里的该字段会被忽略。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderInput {
    /// 校验必填字段，失败时返回 400
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::from_validation(errors, ORDER_REQUIRED_MESSAGE))
    }

    /// 缺省或为 0 时按 1 件处理
    pub fn quantity_or_default(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    pub fn status_or_default(&self) -> OrderStatus {
        self.status.unwrap_or_default()
    }
}

impl Order {
    /// 由下单请求直接构造订单
    pub fn from_input(
        id: impl Into<String>,
        input: &OrderInput,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: input.product_id.clone().unwrap_or_default(),
            product_name: input.product_name.clone().unwrap_or_default(),
            buyer_name: input.buyer_name.clone().unwrap_or_default(),
            buyer_email: input.buyer_email.clone().unwrap_or_default(),
            shipping_address: input.shipping_address.clone().unwrap_or_default(),
            quantity: input.quantity_or_default(),
            total_price: input.total_price.unwrap_or_default(),
            status: input.status_or_default(),
            created_at: created_at.into(),
        }
    }

    /// 应用部分更新；`id` 与 `created_at` 保持不变
    pub fn patched(mut self, patch: &OrderPatch) -> Self {
        if let Some(product_name) = &patch.product_name {
            self.product_name = product_name.clone();
        }
        if let Some(buyer_name) = &patch.buyer_name {
            self.buyer_name = buyer_name.clone();
        }
        if let Some(buyer_email) = &patch.buyer_email {
            self.buyer_email = buyer_email.clone();
        }
        if let Some(address) = &patch.shipping_address {
            self.shipping_address = address.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(total_price) = patch.total_price {
            self.total_price = total_price;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> OrderInput {
        OrderInput {
            product_id: Some("prod_1".to_string()),
            buyer_name: Some("Ada".to_string()),
            buyer_email: Some("ada@example.com".to_string()),
            shipping_address: Some("1 Loop Rd".to_string()),
            ..OrderInput::default()
        }
    }

    #[test]
    fn test_check_requires_all_contact_fields() {
        assert!(input().check().is_ok());

        let no_address = OrderInput {
            shipping_address: None,
            ..input()
        };
        assert_eq!(
            no_address.check(),
            Err(CoreError::BadRequest(ORDER_REQUIRED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_from_input_defaults() {
        let order = Order::from_input("order_1", &input(), "2024-05-01T00:00:00Z");
        assert_eq!(order.quantity, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.product_name, "");
        assert_eq!(order.created_at, "2024-05-01T00:00:00Z");
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let order = Order::from_input("order_1", &input(), "2024-05-01T00:00:00Z");
        let patch = OrderPatch {
            status: Some(OrderStatus::Shipped),
            ..OrderPatch::default()
        };
        let updated = order.clone().patched(&patch);
        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.buyer_name, order.buyer_name);
        assert_eq!(updated.created_at, order.created_at);
    }

    #[test]
    fn test_zero_quantity_counts_as_one() {
        let zero = OrderInput {
            quantity: Some(0),
            ..input()
        };
        assert_eq!(zero.quantity_or_default(), 1);
        assert_eq!(Order::from_input("order_1", &zero, "").quantity, 1);

        let three = OrderInput {
            quantity: Some(3),
            ..input()
        };
        assert_eq!(three.quantity_or_default(), 3);
    }

    #[test]
    fn test_patch_ignores_product_id() {
        let order = Order::from_input("order_1", &input(), "2024-05-01T00:00:00Z");
        let patch: OrderPatch =
            serde_json::from_str(r#"{"productId":"prod_999","status":"shipped"}"#).unwrap();
        let updated = order.patched(&patch);
        assert_eq!(updated.product_id, "prod_1");
        assert_eq!(updated.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("seller".parse::<OrderStatus>().is_err());
        assert!(serde_json::from_str::<OrderPatch>(r#"{"status":"seller"}"#).is_err());

        let patch: OrderPatch = serde_json::from_str(r#"{"status":"delivered"}"#).unwrap();
        assert_eq!(patch.status, Some(OrderStatus::Delivered));
    }
}
