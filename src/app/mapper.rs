//! 远程记录与领域对象之间的映射
//!
//! 每种资源各有一对编码/解码结构体，字段名由 serde 在编译期绑定。
//! 解码不会失败：类型不符的值退化为零值。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::order::model::{Order, OrderInput, OrderPatch, OrderStatus};
use super::product::model::{Product, ProductInput};
use crate::infrastructure::store::{FieldMap, RawRecord};

/// 宽松的字段解码器
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::app::order::model::OrderStatus;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        })
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Ok(value
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or_else(super::default_quantity))
    }

    pub fn status<'de, D: Deserializer<'de>>(d: D) -> Result<OrderStatus, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s.parse().unwrap_or_default(),
            _ => OrderStatus::default(),
        })
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
    }
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFields {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    description: String,
    #[serde(default, deserialize_with = "lenient::number")]
    price: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    image_url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    seller: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderFields {
    #[serde(default, deserialize_with = "lenient::string")]
    product_id: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    buyer_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    buyer_email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    shipping_address: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient::quantity")]
    quantity: u32,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    total_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::status")]
    status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<String>,
}

fn into_map<T: Serialize>(fields: &T) -> FieldMap {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => map,
        _ => FieldMap::new(),
    }
}

fn decode<T: DeserializeOwned + Default>(fields: FieldMap) -> T {
    serde_json::from_value(Value::Object(fields)).unwrap_or_default()
}

/// 远程记录 -> 商品
pub fn to_product(raw: RawRecord) -> Product {
    let fields: ProductFields = decode(raw.fields);
    Product {
        id: raw.id,
        name: fields.name,
        description: fields.description,
        price: fields.price,
        image_url: fields.image_url,
        seller: fields.seller,
    }
}

/// 远程记录 -> 订单；缺少 `createdAt` 时取记录的远程创建时间
pub fn to_order(raw: RawRecord) -> Order {
    let fields: OrderFields = decode(raw.fields);
    Order {
        id: raw.id,
        product_id: fields.product_id,
        product_name: fields.product_name.unwrap_or_default(),
        buyer_name: fields.buyer_name,
        buyer_email: fields.buyer_email,
        shipping_address: fields.shipping_address,
        quantity: fields.quantity,
        total_price: fields.total_price.unwrap_or_default(),
        status: fields.status,
        created_at: fields
            .created_at
            .or(raw.created_time)
            .unwrap_or_default(),
    }
}

/// 商品请求 -> 远程字段
pub fn from_product_input(input: &ProductInput) -> FieldMap {
    into_map(&ProductFields {
        name: input.name.clone().unwrap_or_default(),
        description: input.description.clone().unwrap_or_default(),
        price: input.price.unwrap_or_default(),
        image_url: input.image_url.clone().unwrap_or_default(),
        seller: input.seller.clone().unwrap_or_default(),
    })
}

/// 下单请求 -> 远程字段，`created_at` 只在创建时写入
pub fn from_order_input(input: &OrderInput, created_at: &str) -> FieldMap {
    into_map(&OrderFields {
        product_id: input.product_id.clone().unwrap_or_default(),
        product_name: input.product_name.clone(),
        buyer_name: input.buyer_name.clone().unwrap_or_default(),
        buyer_email: input.buyer_email.clone().unwrap_or_default(),
        shipping_address: input.shipping_address.clone().unwrap_or_default(),
        quantity: input.quantity_or_default(),
        total_price: input.total_price,
        status: input.status_or_default(),
        created_at: Some(created_at.to_string()),
    })
}

/// 订单部分更新 -> 远程字段，只包含提供的字段
pub fn from_order_patch(patch: &OrderPatch) -> FieldMap {
    into_map(patch)
}
