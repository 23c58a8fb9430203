//! 商品处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::{
    model::{Product, ProductInput},
    service::ProductService,
};
use crate::core::{
    error::CoreError,
    response::{created, SuccessResponse},
};

#[derive(Clone)]
pub struct ProductState {
    pub product_service: ProductService,
}

/// 商品路由
pub fn routes(product_service: ProductService) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(ProductState { product_service })
}

/// 获取所有商品
pub async fn list_products(State(state): State<ProductState>) -> Json<Vec<Product>> {
    Json(state.product_service.list_products().await)
}

/// 创建新商品
pub async fn create_product(
    State(state): State<ProductState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let Json(input) = payload?;
    input.check()?;

    let product = state.product_service.create_product(input).await;
    Ok(created(product))
}

/// 获取特定商品
pub async fn get_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.get_product(&id).await?;
    Ok(Json(product))
}

/// 更新商品
pub async fn update_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let Json(input) = payload?;
    input.check()?;

    let product = state.product_service.update_product(&id, input).await;
    Ok(Json(product))
}

/// 删除商品
pub async fn delete_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
) -> Json<SuccessResponse> {
    state.product_service.delete_product(&id).await;
    Json(SuccessResponse::ok())
}
