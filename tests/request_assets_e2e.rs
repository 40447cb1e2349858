//! 附件接口端到端测试
//!
//! 需要本地PostgreSQL实例，默认跳过。运行方式：
//! `GOCART_TEST_DATABASE_URL=postgresql://... cargo test -- --ignored`

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use gocart_backend::{
    config::Config,
    database::Database,
    handlers::AppState,
    routes::create_api_routes,
    storage::{AssetStorage, StorageError, StorageResult},
};
use http_body_util::BodyExt;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;
use uuid::Uuid;

/// 记录型存储桩：上传返回确定性键，URL解析拼接假域名，删除计数
#[derive(Debug, Default)]
struct RecordingStorage {
    uploads: AtomicUsize,
    deletes: AtomicUsize,
    deleted_keys: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl AssetStorage for RecordingStorage {
    async fn upload(
        &self,
        request_id: &str,
        content: &[u8],
        filename: &str,
    ) -> StorageResult<String> {
        if content.is_empty() {
            return Err(StorageError::Validation("文件内容为空".to_string()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        Ok(format!("assets/{}/{}{}", request_id, Uuid::new_v4(), ext))
    }

    async fn delete(&self, file_key: &str) -> StorageResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.deleted_keys
            .lock()
            .unwrap()
            .push(file_key.to_string());
        Ok(true)
    }

    async fn resolve_url(&self, file_key: &str, expires_in_secs: u64) -> StorageResult<String> {
        Ok(format!(
            "https://storage.test/{}?expires={}",
            file_key, expires_in_secs
        ))
    }
}

fn test_database_url() -> Option<String> {
    std::env::var("GOCART_TEST_DATABASE_URL").ok()
}

async fn build_app() -> (Router, Arc<RecordingStorage>) {
    let mut config = Config::default();
    config.database.url = test_database_url().expect("缺少GOCART_TEST_DATABASE_URL");

    let database = Database::new(&config.database).await.unwrap();
    database.init_schema().await.unwrap();

    let storage = Arc::new(RecordingStorage::default());
    let app_state = AppState {
        database,
        storage: storage.clone(),
        config,
    };

    let app = create_api_routes().with_state(app_state);
    (app, storage)
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(request_id: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "gocart-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"request_id\"\r\n\r\n{request_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn create_request(app: &Router) -> Uuid {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/requests/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"shopify_user_id": "user-1", "query": "一双跑步鞋"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    Uuid::parse_str(json["data"]["request_id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
#[ignore = "需要本地PostgreSQL"]
async fn test_asset_upload_list_delete_flow() {
    let (app, storage) = build_app().await;
    let request_id = create_request(&app).await;

    // 上传附件
    let (content_type, body) = multipart_body(&request_id.to_string(), "test.txt", b"hello world");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/request-assets/upload")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    let asset_id = json["data"]["request_asset_id"].as_str().unwrap().to_string();
    let url = json["data"]["url"].as_str().unwrap();
    // URL由存储桩现场解析，路径部分保留原始扩展名
    let path = url.split('?').next().unwrap();
    assert!(path.ends_with(".txt"));
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);

    // 列表应有一条记录，且URL重新解析
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/request-assets/?request_id={}", request_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // 删除附件，存储侧应恰好删除一次
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/request-assets/{}", asset_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(storage.deletes.load(Ordering::SeqCst), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/request-assets/?request_id={}", request_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = response_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "需要本地PostgreSQL"]
async fn test_asset_upload_rejects_missing_request() {
    let (app, storage) = build_app().await;

    let phantom_id = Uuid::new_v4();
    let (content_type, body) = multipart_body(&phantom_id.to_string(), "test.txt", b"hello");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/request-assets/upload")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    // 归属请求不存在时不触碰存储后端
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[ignore = "需要本地PostgreSQL"]
async fn test_asset_upload_rejects_empty_file() {
    let (app, storage) = build_app().await;
    let request_id = create_request(&app).await;

    let (content_type, body) = multipart_body(&request_id.to_string(), "empty.txt", b"");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/request-assets/upload")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 0);
}
