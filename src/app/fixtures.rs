//! 模拟数据
//!
//! 远程存储不可用时使用的只读样例，进程内首次访问时初始化，之后不再变化。
//! 降级路径上“创建”的对象只返回给调用方，不会写回这里。

use chrono::{Duration, Utc};
use std::sync::OnceLock;

use super::order::model::{Order, OrderStatus};
use super::product::model::Product;

static MOCK_PRODUCTS: OnceLock<Vec<Product>> = OnceLock::new();
static MOCK_ORDERS: OnceLock<Vec<Order>> = OnceLock::new();

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";

fn product(id: &str, name: &str, description: &str, price: f64, seller: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        image_url: PLACEHOLDER_IMAGE.to_string(),
        seller: seller.to_string(),
    }
}

/// 模拟商品列表
pub fn mock_products() -> &'static [Product] {
    MOCK_PRODUCTS.get_or_init(|| {
        vec![
            product(
                "prod_1",
                "Wireless Headphones",
                "High-quality wireless headphones with noise cancellation",
                129.99,
                "Audio Tech",
            ),
            product(
                "prod_2",
                "Smart Watch",
                "Fitness tracker and smartwatch with heart rate monitoring",
                199.99,
                "Tech Gear",
            ),
            product(
                "prod_3",
                "Portable Bluetooth Speaker",
                "Waterproof portable speaker with 20-hour battery life",
                79.99,
                "Sound Systems",
            ),
            product(
                "prod_4",
                "Mechanical Keyboard",
                "RGB mechanical keyboard with customizable switches",
                149.99,
                "Tech Accessories",
            ),
            product(
                "prod_5",
                "Smartphone Stand",
                "Adjustable smartphone stand for desk or bedside",
                24.99,
                "Mobile Accessories",
            ),
        ]
    })
}

/// 模拟订单列表
pub fn mock_orders() -> &'static [Order] {
    MOCK_ORDERS.get_or_init(|| {
        let now = Utc::now();
        vec![
            Order {
                id: "order_1".to_string(),
                product_id: "prod_1".to_string(),
                product_name: "Wireless Headphones".to_string(),
                buyer_name: "John Doe".to_string(),
                buyer_email: "john@example.com".to_string(),
                shipping_address: "123 Main St, City, Country".to_string(),
                quantity: 1,
                total_price: 129.99,
                status: OrderStatus::Pending,
                created_at: now.to_rfc3339(),
            },
            Order {
                id: "order_2".to_string(),
                product_id: "prod_2".to_string(),
                product_name: "Smart Watch".to_string(),
                buyer_name: "Jane Smith".to_string(),
                buyer_email: "jane@example.com".to_string(),
                shipping_address: "456 Oak Ave, Town, Country".to_string(),
                quantity: 1,
                total_price: 199.99,
                status: OrderStatus::Shipped,
                created_at: (now - Duration::days(1)).to_rfc3339(),
            },
        ]
    })
}

pub fn find_product(id: &str) -> Option<&'static Product> {
    mock_products().iter().find(|p| p.id == id)
}

pub fn find_order(id: &str) -> Option<&'static Order> {
    mock_orders().iter().find(|o| o.id == id)
}

/// 降级路径使用的临时 ID，形如 `prod_1717000000000`
pub fn synthetic_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Utc::now().timestamp_millis())
}
