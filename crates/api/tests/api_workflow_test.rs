use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use navgate_api::auth::credential::StaticCredentialVerifier;
use navgate_api::auth::token::TokenService;
use navgate_api::server::{AppState, build_router};
use navgate_api::types::{LoginRequest, LoginResponse, PurchaseResponse};
use navgate_cache::family::MemFamilyCache;
use navgate_core::cache::port::FamilyCache;
use navgate_core::common::time::{FakeClockProvider, RealTimeProvider};
use navgate_core::fund::entity::SchemeQuote;
use navgate_core::fund::error::UpstreamError;
use navgate_core::store::port::PurchaseLedger;
use navgate_core::test_utils::{MemoryPurchaseLedger, StubFundProvider, sample_scheme};
use navgate_store::purchase::SqlitePurchaseLedger;

const USERNAME: &str = "demo";
const PASSWORD: &str = "test_pwd";
const SECRET: &str = "integration-secret";

struct TestServer {
    base_url: String,
    funds: Arc<StubFundProvider>,
    _tmp: tempfile::TempDir,
}

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server(ledger: Option<Arc<dyn PurchaseLedger>>) -> TestServer {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
    // 工作区内 reqwest 以 rustls-no-provider 编译，构建客户端前需要加密后端
    let _ = rustls::crypto::ring::default_provider().install_default();

    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ledger: Arc<dyn PurchaseLedger> = match ledger {
        Some(l) => l,
        None => Arc::new(
            SqlitePurchaseLedger::open(&tmp_dir.path().join("funds.db"))
                .await
                .unwrap(),
        ),
    };

    let funds = Arc::new(StubFundProvider::new());
    funds
        .insert_scheme(sample_scheme(100001, "Sample Fund", 25.50, "Sample Mutual Fund"))
        .await;
    funds
        .insert_scheme(sample_scheme(100002, "Sample Debt Fund", 11.25, "Sample Mutual Fund"))
        .await;
    funds
        .insert_scheme(sample_scheme(200001, "Other Growth Fund", 99.0, "Other Mutual Fund"))
        .await;

    let families = Arc::new(MemFamilyCache::new());
    families.replace(
        ["Other Mutual Fund", "Sample Mutual Fund"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    let clock = Arc::new(RealTimeProvider);
    let tokens = TokenService::new(SECRET, "HS256", Duration::minutes(30), clock.clone()).unwrap();

    let state = AppState {
        credentials: Arc::new(StaticCredentialVerifier::new(USERNAME, PASSWORD)),
        tokens: Arc::new(tokens),
        funds: funds.clone(),
        ledger,
        families,
        clock,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = build_router(state);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        funds,
        _tmp: tmp_dir,
    }
}

async fn login(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{}/login", base_url))
        .json(&LoginRequest {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: LoginResponse = res.json().await.unwrap();
    assert_eq!(body.token_type, "bearer");
    assert_eq!(body.expires_in, 1800);
    body.access_token
}

#[tokio::test]
async fn test_full_purchase_workflow() {
    let server = spawn_test_server(None).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 存活检查与公开的家族列表
    // ============================================
    let res = client.get(format!("{}/", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to the Mutual Fund API!");

    let res = client
        .get(format!("{}/fund_families", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"families": ["Other Mutual Fund", "Sample Mutual Fund"]}));

    // ============================================
    // Case 2: 登录失败 (密码错误)
    // ============================================
    let res = client
        .post(format!("{}/login", base_url))
        .json(&LoginRequest {
            username: USERNAME.to_string(),
            password: "wrongpassword".to_string(),
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Bearer");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Incorrect username or password");
    assert!(body.get("access_token").is_none());

    // ============================================
    // Case 3: 成功登录
    // ============================================
    let token = login(&client, base_url).await;

    // ============================================
    // Case 4: 空账本
    // ============================================
    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Value> = res.json().await.unwrap();
    assert!(body.is_empty());

    // ============================================
    // Case 5: 购买
    // ============================================
    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "100001", "units": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: PurchaseResponse = res.json().await.unwrap();
    assert_eq!(body.message, "Purchased 10 units of Sample Fund");
    assert_eq!(body.current_value, 25.50);

    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["scheme_name"], "Sample Fund");
    assert_eq!(body[0]["units"], 10);
    assert_eq!(body[0]["value"], 25.5);
    assert!(body[0]["purchase_time"].is_string());

    // ============================================
    // Case 6: 重复提交产生两条独立记录
    // ============================================
    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "100001", "units": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert_eq!(body.len(), 2);

    // ============================================
    // Case 7: 查询家族方案
    // ============================================
    let res = client
        .get(format!("{}/funds/Sample%20Mutual%20Fund", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Value> = res.json().await.unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["Scheme_Name"], "Sample Fund");
    assert_eq!(body[1]["Net_Asset_Value"], 11.25);
}

#[tokio::test]
async fn test_upstream_failure_is_mirrored_and_nothing_recorded() {
    let server = spawn_test_server(None).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();
    let token = login(&client, base_url).await;

    server
        .funds
        .fail_with("100001", UpstreamError::Status { status: 503 })
        .await;
    server
        .funds
        .fail_with("Broken Mutual Fund", UpstreamError::Status { status: 500 })
        .await;

    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "100001", "units": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Failed to fetch scheme value");

    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert!(body.is_empty(), "上游失败时不应写入账本");

    let res = client
        .get(format!("{}/funds/Broken%20Mutual%20Fund", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Failed to fetch schemes");

    // 未知基金代码
    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "424242", "units": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_endpoints_reject_missing_and_bad_tokens() {
    let server = spawn_test_server(None).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();

    // 已过期的 Token：同一密钥，但 1 小时前签发
    let past_clock = Arc::new(FakeClockProvider::new(Utc::now() - Duration::hours(1)));
    let stale_issuer =
        TokenService::new(SECRET, "HS256", Duration::minutes(30), past_clock).unwrap();
    let expired = stale_issuer.issue(USERNAME).unwrap().token;

    // 其他密钥签发的 Token
    let foreign_issuer = TokenService::new(
        "someone-else",
        "HS256",
        Duration::minutes(30),
        Arc::new(RealTimeProvider),
    )
    .unwrap();
    let foreign = foreign_issuer.issue(USERNAME).unwrap().token;

    let requests = vec![
        client.get(format!("{}/funds/purchases", base_url)),
        client
            .post(format!("{}/funds/purchase", base_url))
            .json(&json!({"scheme_code": "100001", "units": 1})),
        client.get(format!("{}/funds/Sample%20Mutual%20Fund", base_url)),
    ];

    for builder in requests {
        let template = builder.build().unwrap();

        // 无 Token
        let res = client.execute(template.try_clone().unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()["www-authenticate"], "Bearer");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["detail"], "Not authenticated");

        // 非 Bearer 方案
        let mut basic = template.try_clone().unwrap();
        basic
            .headers_mut()
            .insert("authorization", "Basic ZGVtbzp0ZXN0".parse().unwrap());
        let res = client.execute(basic).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        for bad in ["garbage", expired.as_str(), foreign.as_str()] {
            let mut req = template.try_clone().unwrap();
            req.headers_mut().insert(
                "authorization",
                format!("Bearer {}", bad).parse().unwrap(),
            );
            let res = client.execute(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(res.headers()["www-authenticate"], "Bearer");
            let body: Value = res.json().await.unwrap();
            assert_eq!(body["detail"], "Could not validate credentials");
        }
    }

    // 上述请求均未写入账本
    let token = login(&client, base_url).await;
    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_invalid_purchase_requests_are_rejected() {
    let server = spawn_test_server(None).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();
    let token = login(&client, base_url).await;

    for payload in [
        json!({"scheme_code": "100001", "units": 0}),
        json!({"scheme_code": "100001", "units": -3}),
        json!({"scheme_code": "  ", "units": 1}),
    ] {
        let res = client
            .post(format!("{}/funds/purchase", base_url))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {payload}");
    }

    // 被拒绝的请求不会写入账本
    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_purchase_of_unnamed_scheme_is_recorded_as_unknown() {
    let server = spawn_test_server(None).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();
    let token = login(&client, base_url).await;

    server
        .funds
        .insert_quote(
            "300001",
            SchemeQuote {
                scheme_code: Some(300001),
                name: None,
                net_asset_value: 42.0,
            },
        )
        .await;

    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "300001", "units": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: PurchaseResponse = res.json().await.unwrap();
    assert_eq!(body.message, "Purchased 2 units of Unknown Scheme");
    assert_eq!(body.current_value, 42.0);

    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["scheme_name"], "Unknown Scheme");
    assert_eq!(body[0]["units"], 2);
    assert_eq!(body[0]["value"], 42.0);
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_server_error() {
    let ledger = Arc::new(MemoryPurchaseLedger::new());
    ledger.set_broken(true);
    let server = spawn_test_server(Some(ledger.clone())).await;
    let base_url = &server.base_url;
    let client = reqwest::Client::new();
    let token = login(&client, base_url).await;

    let res = client
        .post(format!("{}/funds/purchase", base_url))
        .bearer_auth(&token)
        .json(&json!({"scheme_code": "100001", "units": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Internal server error");

    ledger.set_broken(false);
    let res = client
        .get(format!("{}/funds/purchases", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Vec<Value> = res.json().await.unwrap();
    assert!(body.is_empty());
}
