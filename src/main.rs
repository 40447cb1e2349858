/*
 * GoCart - AI Shopping Assistant Backend
 * Copyright (c) 2025 GoCart Project
 *
 * This work is licensed under CC BY-NC-SA 4.0
 * https://creativecommons.org/licenses/by-nc-sa/4.0/
 */

use axum::response::Html;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Query, State},
    http::Method,
    response::Json,
    routing::get,
};
use gocart_backend::{
    config::Config,
    database::Database,
    docs::ApiDoc,
    error::AppResult,
    handlers::AppState,
    response::ApiResponse,
    routes::create_api_routes,
    storage::create_storage,
};
use serde::Deserialize;
use std::collections::HashMap;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

#[derive(Deserialize)]
struct HealthQuery {
    #[serde(default)]
    detail: bool,
}

/// 健康检查处理器
async fn health_check(Query(params): Query<HealthQuery>) -> Json<ApiResponse<serde_json::Value>> {
    if params.detail {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let mut details = std::collections::HashMap::new();
        details.insert("status", "healthy");
        details.insert("version", "0.1.0");
        details.insert("timestamp", timestamp.as_str());

        Json(ApiResponse::success(serde_json::json!(details)))
    } else {
        Json(ApiResponse::success(serde_json::json!({"status": "ok"})))
    }
}

/// 系统信息处理器
async fn system_info() -> Json<ApiResponse<HashMap<&'static str, serde_json::Value>>> {
    let mut info = HashMap::new();
    info.insert("name", serde_json::json!("GoCart Backend"));
    info.insert("version", serde_json::json!("0.1.0"));
    info.insert(
        "build_time",
        serde_json::json!(chrono::Utc::now().to_rfc3339()),
    );

    Json(ApiResponse::success(info))
}

/// 数据库健康检查处理器
async fn db_health_check(
    State(app_state): State<AppState>,
) -> Json<ApiResponse<serde_json::Value>> {
    match app_state.database.health_check().await {
        Ok(true) => {
            let timestamp = chrono::Utc::now().to_rfc3339();
            let mut details = HashMap::new();
            details.insert("database", "healthy");
            details.insert("timestamp", timestamp.as_str());
            Json(ApiResponse::success(serde_json::json!(details)))
        }
        Ok(false) => Json(ApiResponse::error_with_data(
            503,
            "数据库连接异常".to_string(),
            serde_json::json!({"status": "unhealthy"}),
        )),
        Err(e) => {
            tracing::error!("数据库健康检查失败: {}", e);
            Json(ApiResponse::error_with_data(
                503,
                format!("数据库健康检查失败: {}", e),
                serde_json::json!({"status": "error"}),
            ))
        }
    }
}

/// Swagger UI 页面（访问路径：/swagger-ui 或 /swagger-ui/）
/// OpenAPI JSON 路径：/api-docs/openapi.json
async fn swagger_ui_page() -> Html<String> {
    let html = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset=UTF-8>
  <title>GoCart API 文档</title>
  <link rel=stylesheet href=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui.css>
  <style>
    body { margin: 0; font-family: Arial, sans-serif; }
    #swagger-ui { max-width: 100%; }
  </style>
</head>
<body>
  <div id=swagger-ui>
    <div style="padding: 50px; text-align: center;">正在加载 API 文档...</div>
  </div>
  <script src=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui-bundle.js></script>
  <script src=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui-standalone-preset.js></script>
  <script>
    window.onload = function() {
      try {
        window.ui = SwaggerUIBundle({
          url: '/api-docs/openapi.json',
          dom_id: '#swagger-ui',
          deepLinking: true,
          presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
          layout: 'StandaloneLayout',
          validatorUrl: null
        });
      } catch (error) {
        console.error('SwaggerUI error:', error);
        document.getElementById('swagger-ui').innerHTML = '<h2>Failed to load API docs</h2><a href="/api-docs/openapi.json">View raw OpenAPI JSON</a>';
      }
    };
  </script>
</body>
</html>"#
        .to_string();
    Html(html)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gocart_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = match Config::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("已加载配置文件: config.toml");
            config
        }
        Err(_) => {
            tracing::warn!("未找到配置文件，使用默认配置");
            let default_config = Config::default();
            // 保存默认配置到文件
            if let Err(e) = default_config.save_to_file("config.toml") {
                tracing::warn!("保存默认配置失败: {}", e);
            }
            default_config
        }
    };

    tracing::info!("服务器配置: {}", config.server_addr());

    // 初始化数据库，连接失败直接退出
    let database = Database::new(&config.database).await?;
    database.init_schema().await?;

    // 初始化存储后端，配置不完整直接退出
    let storage = create_storage(&config.storage).await?;
    tracing::info!("存储后端初始化成功: {:?}", config.storage.backend);

    // 创建应用状态
    let app_state = AppState {
        database,
        storage,
        config: config.clone(),
    };

    // 创建CORS中间件
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    // 创建主路由
    let app = Router::new()
        // 健康检查和系统信息
        .route("/", get(system_info))
        .route("/health", get(health_check))
        .route("/api/system/info", get(system_info))
        .route("/api/health/db", get(db_health_check))
        // OpenAPI JSON 路由
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // Swagger UI 页面
        .route("/swagger-ui", get(swagger_ui_page))
        .route("/swagger-ui/", get(swagger_ui_page))
        // 业务API路由
        .merge(create_api_routes())
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.file.max_size as usize)) // 设置请求体大小限制
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("🚀 服务器启动成功，监听地址: {}", config.server_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
