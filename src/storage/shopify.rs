use super::{AssetStorage, StorageError, StorageResult, detect_content_type};
use crate::config::ShopifyConfig;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;

/// Shopify Admin GraphQL 认证头
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// URL解析的最大轮询次数
const RESOLVE_ATTEMPTS: u32 = 6;

/// 轮询退避基数，第n次失败后等待 n * 该值
const RESOLVE_BACKOFF: Duration = Duration::from_millis(300);

const STAGED_UPLOADS_CREATE: &str = "mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {\
  stagedUploadsCreate(input: $input) {\
    stagedTargets { url resourceUrl parameters { name value } }\
    userErrors { field message }\
  }\
}";

const FILE_CREATE: &str = "mutation fileCreate($files: [FileCreateInput!]!) {\
  fileCreate(files: $files) {\
    files { id fileStatus\
      ... on MediaImage { image { url } }\
      ... on GenericFile { url }\
      ... on Video { sources { url } }\
    }\
    userErrors { field message code }\
  }\
}";

const FILE_DELETE: &str = "mutation fileDelete($ids: [ID!]!) {\
  fileDelete(fileIds: $ids) { deletedFileIds userErrors { message code } }\
}";

const FILE_BY_ID: &str = "query fileById($id: ID!) {\
  node(id: $id) { id\
    ... on MediaImage { fileStatus image { url } }\
    ... on GenericFile { fileStatus url }\
    ... on Video { fileStatus sources { url } }\
  }\
}";

/// Shopify文件存储实现
///
/// 通过Admin GraphQL API管理文件：三阶段上传（预约暂存目标 → 上传字节 →
/// 注册托管文件），存储键为Shopify文件ID（`gid://...`）。文件处理是异步的，
/// URL解析需要有界轮询。
#[derive(Clone)]
pub struct ShopifyFilesStorage {
    client: Client,
    graphql_url: String,
    access_token: String,
    resolve_attempts: u32,
    resolve_backoff: Duration,
}

impl std::fmt::Debug for ShopifyFilesStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyFilesStorage")
            .field("graphql_url", &self.graphql_url)
            .field("access_token", &"***")
            .finish()
    }
}

/// 暂存上传目标（一次性使用，不持久化）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StagedTarget {
    url: String,
    resource_url: String,
    #[serde(default)]
    parameters: Vec<StagedParameter>,
}

/// 暂存上传需要附带的表单字段
#[derive(Debug, Deserialize)]
struct StagedParameter {
    name: String,
    value: String,
}

/// fileCreate返回的托管文件
#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

impl ShopifyFilesStorage {
    /// 创建新的Shopify文件存储实例
    pub fn new(config: ShopifyConfig) -> StorageResult<Self> {
        // 允许带或不带协议前缀的域名写法
        let domain = config
            .store_domain
            .trim()
            .replace("https://", "")
            .replace("http://", "")
            .trim_end_matches('/')
            .to_string();
        let access_token = config.admin_access_token.trim().to_string();

        if domain.is_empty() || access_token.is_empty() {
            return Err(StorageError::Configuration(
                "Shopify配置不完整，store_domain、admin_access_token均为必填".to_string(),
            ));
        }

        let graphql_url = format!(
            "https://{}/admin/api/{}/graphql.json",
            domain, config.api_version
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StorageError::Configuration(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            graphql_url,
            access_token,
            resolve_attempts: RESOLVE_ATTEMPTS,
            resolve_backoff: RESOLVE_BACKOFF,
        })
    }

    /// 执行一次GraphQL调用，返回响应的data部分
    ///
    /// HTTP >= 400 或非空errors列表均视为失败。
    async fn graphql(&self, query: &str, variables: JsonValue) -> StorageResult<JsonValue> {
        let resp = self
            .client
            .post(&self.graphql_url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Shopify GraphQL请求失败: {}", e)))?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Backend(format!(
                "Shopify GraphQL错误: HTTP {}: {}",
                status, body
            )));
        }

        let mut body: JsonValue = resp
            .json()
            .await
            .map_err(|e| StorageError::Backend(format!("解析GraphQL响应失败: {}", e)))?;

        if has_graphql_errors(&body) {
            return Err(StorageError::Backend(format!(
                "Shopify GraphQL返回错误: {}",
                body["errors"]
            )));
        }

        Ok(body.get_mut("data").map(JsonValue::take).unwrap_or(JsonValue::Null))
    }

    /// 第attempt次尝试失败后的线性退避
    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(self.resolve_backoff * attempt).await;
    }
}

#[async_trait::async_trait]
impl AssetStorage for ShopifyFilesStorage {
    async fn upload(
        &self,
        request_id: &str,
        content: &[u8],
        filename: &str,
    ) -> StorageResult<String> {
        if filename.is_empty() {
            return Err(StorageError::Validation("缺少文件名".to_string()));
        }
        if content.is_empty() {
            return Err(StorageError::Validation("文件内容为空".to_string()));
        }

        let (mime, category) = detect_content_type(filename);

        // 1) 预约暂存上传目标
        // fileSize必须编码为字符串（GraphQL schema中为UnsignedInt64）
        let variables = json!({
            "input": [{
                "resource": "FILE",
                "filename": filename,
                "mimeType": mime,
                "httpMethod": "POST",
                "fileSize": content.len().to_string(),
            }]
        });
        let data = self.graphql(STAGED_UPLOADS_CREATE, variables).await?;
        let payload = &data["stagedUploadsCreate"];
        if has_user_errors(payload) {
            return Err(StorageError::Upload(format!(
                "stagedUploadsCreate返回错误: {}",
                payload["userErrors"]
            )));
        }

        let targets: Vec<StagedTarget> =
            serde_json::from_value(payload["stagedTargets"].clone()).unwrap_or_default();
        let target = targets
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Upload("Shopify未返回暂存上传目标".to_string()))?;

        // 2) 按Shopify给定的表单字段上传字节，文件内容固定放在file字段
        let mut form = Form::new();
        for param in &target.parameters {
            form = form.text(param.name.clone(), param.value.clone());
        }
        let part = Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_str(&mime)
            .map_err(|e| StorageError::Upload(format!("构造上传表单失败: {}", e)))?;
        form = form.part("file", part);

        let resp = self
            .client
            .post(&target.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("暂存上传请求失败: {}", e)))?;
        let status = resp.status().as_u16();
        if !matches!(status, 200 | 201 | 204) {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Upload(format!(
                "暂存上传失败，HTTP {}: {}",
                status, body
            )));
        }

        // 3) 将已上传的资源注册为Shopify托管文件
        let alt_text = format!("request:{} filename:{}", request_id, filename);
        let variables = json!({
            "files": [{
                "alt": alt_text,
                "contentType": category.as_str(),
                "originalSource": target.resource_url,
            }]
        });
        let data = self.graphql(FILE_CREATE, variables).await?;
        let payload = &data["fileCreate"];
        if has_user_errors(payload) {
            return Err(StorageError::Upload(format!(
                "fileCreate返回错误: {}",
                payload["userErrors"]
            )));
        }

        let files: Vec<CreatedFile> =
            serde_json::from_value(payload["files"].clone()).unwrap_or_default();
        let file = files
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Upload("fileCreate未返回文件".to_string()))?;

        tracing::info!("Shopify文件注册成功: {}", file.id);
        Ok(file.id)
    }

    async fn delete(&self, file_key: &str) -> StorageResult<bool> {
        // 非gid格式不可能是Shopify文件句柄，直接视为成功，不发起网络请求
        if !file_key.starts_with("gid://") {
            tracing::debug!("存储键不是Shopify文件ID，跳过删除: {}", file_key);
            return Ok(true);
        }

        // Shopify的删除是异步的，只要请求被接受即视为成功
        let _ = self.graphql(FILE_DELETE, json!({ "ids": [file_key] })).await?;
        tracing::info!("已提交Shopify文件删除: {}", file_key);
        Ok(true)
    }

    async fn resolve_url(&self, file_key: &str, _expires_in_secs: u64) -> StorageResult<String> {
        // 文件注册后的处理是异步的，URL可能尚未就绪，有界轮询等待
        for attempt in 1..=self.resolve_attempts {
            let last = attempt == self.resolve_attempts;

            let resp = self
                .client
                .post(&self.graphql_url)
                .header(ACCESS_TOKEN_HEADER, &self.access_token)
                .json(&json!({ "query": FILE_BY_ID, "variables": { "id": file_key } }))
                .send()
                .await
                .map_err(|e| StorageError::Resolve(format!("Shopify GraphQL请求失败: {}", e)))?;

            let status = resp.status();
            if status.as_u16() >= 400 {
                let body = resp.text().await.unwrap_or_default();
                return Err(StorageError::Resolve(format!(
                    "Shopify GraphQL错误: HTTP {}: {}",
                    status, body
                )));
            }

            let body: JsonValue = resp
                .json()
                .await
                .map_err(|e| StorageError::Resolve(format!("解析GraphQL响应失败: {}", e)))?;

            // 节点尚不可见时errors列表非空，重试；最后一轮则失败
            if has_graphql_errors(&body) {
                if last {
                    return Err(StorageError::Resolve(format!(
                        "Shopify GraphQL返回错误: {}",
                        body["errors"]
                    )));
                }
                self.backoff(attempt).await;
                continue;
            }

            let node = &body["data"]["node"];
            if node.is_null() {
                if last {
                    return Err(StorageError::NotFound(format!(
                        "未找到指定ID的文件: {}",
                        file_key
                    )));
                }
                self.backoff(attempt).await;
                continue;
            }

            // 拿到第一个可用URL立即返回
            if let Some(url) = extract_file_url(node) {
                return Ok(url);
            }

            if !last {
                self.backoff(attempt).await;
            }
        }

        Err(StorageError::NotFound(format!(
            "文件URL尚不可用: {}",
            file_key
        )))
    }
}

/// 判断GraphQL顶层errors列表是否非空
fn has_graphql_errors(body: &JsonValue) -> bool {
    body.get("errors")
        .and_then(|e| e.as_array())
        .is_some_and(|errors| !errors.is_empty())
}

/// 判断mutation payload的userErrors列表是否非空
fn has_user_errors(payload: &JsonValue) -> bool {
    payload
        .get("userErrors")
        .and_then(|e| e.as_array())
        .is_some_and(|errors| !errors.is_empty())
}

/// 按优先级提取文件URL：GenericFile的url → MediaImage的image.url → Video的首个source
fn extract_file_url(node: &JsonValue) -> Option<String> {
    if let Some(url) = node.get("url").and_then(|u| u.as_str()) {
        return Some(url.to_string());
    }
    if let Some(url) = node
        .get("image")
        .and_then(|image| image.get("url"))
        .and_then(|u| u.as_str())
    {
        return Some(url.to_string());
    }
    node.get("sources")
        .and_then(|sources| sources.as_array())
        .and_then(|sources| sources.first())
        .and_then(|source| source.get("url"))
        .and_then(|u| u.as_str())
        .map(|url| url.to_string())
}
