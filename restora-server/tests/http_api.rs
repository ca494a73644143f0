//! HTTP 端到端测试
//!
//! 用 tower oneshot 直接驱动完整路由栈，不经网络：
//! 身份头解析、统一响应信封与下单主链路。

use axum::Router;
use axum::body::Body;
use http::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use restora_server::{Config, ServerState, build_router};

struct TestApp {
    router: Router,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().join("restora.db").to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    TestApp {
        router: build_router(state),
        _dir: dir,
    }
}

/// 发起一次同进程请求，返回状态码与解析后的 JSON
async fn call(
    router: &Router,
    method: &str,
    path: &str,
    identity: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some((user, role)) = identity {
        builder = builder
            .header("x-user-id", user)
            .header("x-user-role", role);
    }
    if body.is_some() {
        builder = builder.header("Content-Type", "application/json");
    }
    let request = builder
        .body(Body::from(
            body.map(|b| b.to_string().into_bytes()).unwrap_or_default(),
        ))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 注册账号，返回 `user:...` 形式的 id
async fn register(router: &Router, name: &str, email: &str, role: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "role": role,
            "phone": "600555666",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

/// 开店，返回 (restaurant_id, qr_code)
async fn open_restaurant(router: &Router, owner: &str) -> (String, String) {
    let (status, body) = call(
        router,
        "POST",
        "/api/restaurants",
        Some((owner, "restaurant")),
        Some(json!({
            "name": "Casa Marco",
            "description": "Family-run kitchen, rice dishes all day",
            "cuisine": "spanish",
            "price_range": 2,
            "address": {
                "street": "Calle Mayor 1",
                "city": "Madrid",
                "postal_code": "28001",
                "country": "ES",
            },
            "phone": "+34600111222",
            "email": "owner@casamarco.example",
            "takeaway_available": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (
        body["data"]["id"].as_str().unwrap().to_string(),
        body["data"]["qr_code"].as_str().unwrap().to_string(),
    )
}

async fn add_menu_item(router: &Router, owner: &str, name: &str, price: f64) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/api/menu",
        Some((owner, "restaurant")),
        Some(json!({
            "name": name,
            "description": "House specialty",
            "price": price,
            "category": "main-course",
            "is_vegetarian": true,
            "preparation_time": 15,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Menu item created");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let app = spawn_app().await;

    let (status, body) = call(&app.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let (status, body) = call(&app.router, "GET", "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["event_bus"]["status"], "ok");
}

#[tokio::test]
async fn registration_uses_the_envelope_and_hides_reset_fields() {
    let app = spawn_app().await;

    let (status, body) = call(
        &app.router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "role": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["message"], "Account registered");
    assert_eq!(body["data"]["email"], "ana@example.com");
    let user_id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(user_id.starts_with("user:"));
    // 重置令牌字段永不进响应
    assert!(body["data"].get("reset_password_token").is_none());
    assert!(body["data"].get("reset_password_expire").is_none());

    let (status, body) = call(
        &app.router,
        "GET",
        "/api/accounts/me",
        Some((&user_id, "customer")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "ana@example.com");

    // 邮箱全局唯一
    let (status, body) = call(
        &app.router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({
            "name": "Ana Again",
            "email": "ana@example.com",
            "role": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn missing_or_forged_identity_is_rejected() {
    let app = spawn_app().await;
    let customer = register(&app.router, "Ana", "ana@example.com", "customer").await;

    // 无身份头
    let (status, body) = call(&app.router, "GET", "/api/accounts/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");
    assert_eq!(body["message"], "Please login first");

    // 不存在的账号
    let (status, _) = call(
        &app.router,
        "GET",
        "/api/accounts/me",
        Some(("user:ghost", "customer")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 声明角色与存量角色不符
    let (status, _) = call(
        &app.router,
        "GET",
        "/api/accounts/me",
        Some((&customer, "restaurant")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 非法角色值
    let (status, _) = call(
        &app.router,
        "GET",
        "/api/accounts/me",
        Some((&customer, "admin")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 指向别的表的 id
    let (status, _) = call(
        &app.router,
        "GET",
        "/api/accounts/me",
        Some(("order:abc", "customer")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owners_manage_restaurant_and_menu_over_http() {
    let app = spawn_app().await;
    let owner = register(&app.router, "Marco", "marco@example.com", "restaurant").await;
    let customer = register(&app.router, "Ana", "ana@example.com", "customer").await;

    let (restaurant_id, qr_code) = open_restaurant(&app.router, &owner).await;
    assert!(qr_code.starts_with("RESTORA-"));

    // 顾客开不了店
    let (status, body) = call(
        &app.router,
        "POST",
        "/api/restaurants",
        Some((&customer, "customer")),
        Some(json!({
            "name": "Sneaky Diner",
            "description": "Should never get created",
            "cuisine": "fusion",
            "price_range": 1,
            "address": {
                "street": "Calle Falsa 123",
                "city": "Madrid",
                "postal_code": "28002",
                "country": "ES",
            },
            "phone": "+34600999888",
            "email": "sneaky@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    add_menu_item(&app.router, &owner, "Paella Verde", 12.5).await;

    // 素食菜品自动为餐厅打素食标
    let (status, body) = call(
        &app.router,
        "GET",
        &format!("/api/restaurants/{restaurant_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_vegetarian_options"], true);

    let (status, body) = call(
        &app.router,
        "GET",
        &format!("/api/restaurants/{restaurant_id}/menu"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Paella Verde");

    // 扫码定位餐厅
    let (status, body) = call(
        &app.router,
        "GET",
        &format!("/api/restaurants/qr/{qr_code}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], restaurant_id.as_str());
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let app = spawn_app().await;
    let owner = register(&app.router, "Marco", "marco@example.com", "restaurant").await;
    let customer = register(&app.router, "Ana", "ana@example.com", "customer").await;
    let stranger = register(&app.router, "Eve", "eve@example.com", "customer").await;
    let (restaurant_id, _) = open_restaurant(&app.router, &owner).await;
    let item_id = add_menu_item(&app.router, &owner, "Paella", 10.0).await;

    let (status, body) = call(
        &app.router,
        "POST",
        "/api/orders",
        Some((&customer, "customer")),
        Some(json!({
            "restaurant_id": restaurant_id,
            "items": [{"menu_item_id": item_id, "quantity": 2}],
            "order_type": "takeaway",
            "payment_method": "cash",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["message"], "Order placed");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["final_amount"], 22.0);
    assert!(body["data"]["order_number"].as_str().unwrap().starts_with("ORD"));
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 只有店主能推状态
    let (status, body) = call(
        &app.router,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some((&customer, "customer")),
        Some(json!({"status": "received"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    let (status, body) = call(
        &app.router,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some((&owner, "restaurant")),
        Some(json!({"status": "received"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "received");

    // 跳步推进按冲突报
    let (status, body) = call(
        &app.router,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some((&owner, "restaurant")),
        Some(json!({"status": "served"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // 外人看不到订单
    let (status, _) = call(
        &app.router,
        "GET",
        &format!("/api/orders/{order_id}"),
        Some((&stranger, "customer")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app.router,
        "GET",
        "/api/orders/my",
        Some((&customer, "customer")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = call(
        &app.router,
        "GET",
        "/api/orders/stats",
        Some((&owner, "restaurant")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_orders"], 1);
    assert_eq!(body["data"]["received"], 1);

    // received 窗口内顾客还能取消
    let (status, body) = call(
        &app.router,
        "PUT",
        &format!("/api/orders/{order_id}/cancel"),
        Some((&customer, "customer")),
        Some(json!({"reason": "ordered twice by mistake"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Order cancelled");
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["cancelled_by"], "customer");
}

#[tokio::test]
async fn validation_failures_use_the_envelope() {
    let app = spawn_app().await;
    let customer = register(&app.router, "Ana", "ana@example.com", "customer").await;

    let (status, body) = call(
        &app.router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({
            "name": "X",
            "email": "not-an-email",
            "role": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // 空订单行
    let (status, body) = call(
        &app.router,
        "POST",
        "/api/orders",
        Some((&customer, "customer")),
        Some(json!({
            "restaurant_id": "restaurant:nope",
            "items": [],
            "order_type": "takeaway",
            "payment_method": "cash",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}
