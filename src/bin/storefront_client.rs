//! 客户端示例
//! 演示通过数据访问封装浏览商品、下单并更新订单状态；
//! 服务端不可达时同样能走完流程（使用模拟数据）。

use marketplace::{MarketplaceClient, OrderInput, OrderPatch, OrderStatus};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let base_url = std::env::var("MARKETPLACE_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string());
    let client = MarketplaceClient::new(base_url);

    println!("=== 商品列表 ===");
    let products = client.get_products().await;
    for product in &products {
        println!(
            "{:<10} {:<30} {:>8.2}  {}",
            product.id, product.name, product.price, product.seller
        );
    }

    let Some(first) = products.first() else {
        println!("暂无商品");
        return Ok(());
    };

    let product = client.get_product(&first.id).await?;
    println!();
    println!("=== 商品详情 ===");
    println!("{}: {}", product.name, product.description);

    let quantity = 2;
    let order = client
        .create_order(&OrderInput {
            product_id: Some(product.id.clone()),
            product_name: Some(product.name.clone()),
            buyer_name: Some("Demo Buyer".to_string()),
            buyer_email: Some("buyer@example.com".to_string()),
            shipping_address: Some("1 Demo Street, Sample City".to_string()),
            quantity: Some(quantity),
            total_price: Some(product.price * f64::from(quantity)),
            status: Some(OrderStatus::Pending),
        })
        .await;
    println!();
    println!("=== 下单成功 ===");
    println!(
        "{} - {} x{} = {:.2} ({})",
        order.id, order.product_name, order.quantity, order.total_price, order.status
    );

    let patch = OrderPatch {
        status: Some(OrderStatus::Shipped),
        ..OrderPatch::default()
    };
    match client.update_order(&order.id, &patch).await {
        Ok(updated) => println!("订单 {} 状态更新为 {}", updated.id, updated.status),
        Err(e) => println!("订单状态更新失败: {}", e),
    }

    println!();
    println!("=== 订单列表 ===");
    for order in client.get_orders().await {
        println!(
            "{:<20} {:<25} {:<10} {}",
            order.id, order.product_name, order.status, order.buyer_name
        );
    }

    Ok(())
}
