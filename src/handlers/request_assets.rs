use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{
    CreateRequestAsset, RequestAssetResponse, SignedUrlResponse, UpdateRequestAsset,
};
use crate::repositories::{RequestAssetRepository, RequestRepository};
use crate::response::ApiResponse;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

/// 读取附件时URL的默认有效期（秒）
const DEFAULT_URL_EXPIRES_SECS: u64 = 3600;

/// 附件列表筛选参数
#[derive(Debug, Deserialize)]
pub struct ListAssetsQuery {
    /// 只列出指定购物请求的附件
    pub request_id: Option<Uuid>,
}

/// 附件删除参数
#[derive(Debug, Deserialize)]
pub struct DeleteAssetQuery {
    /// 是否同时删除存储后端中的文件，默认true
    pub delete_from_storage: Option<bool>,
}

/// 签名URL参数
#[derive(Debug, Deserialize)]
pub struct SignedUrlQuery {
    /// 有效期（秒），默认3600
    pub expiration: Option<u64>,
}

/// 上传附件文件
///
/// multipart表单需包含request_id与file两个字段。文件先写入存储后端，
/// 成功后只把返回的存储键落库，URL现解析现用，不落库。
#[utoipa::path(
    post,
    path = "/request-assets/upload",
    tag = "request-assets",
    responses(
        (status = 200, description = "上传成功", body = RequestAssetResponse),
        (status = 400, description = "缺少字段、文件为空或文件名为空"),
        (status = 404, description = "购物请求不存在"),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn upload_request_asset(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<RequestAssetResponse>>, AppError> {
    let mut request_id: Option<Uuid> = None;
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    // 解析multipart数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        let error_msg = format!("{}", e);
        if error_msg.contains("body longer than") || error_msg.contains("body is too large") {
            AppError::bad_request("上传文件过大")
        } else {
            AppError::bad_request(format!("解析上传表单失败: {}", e))
        }
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "request_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("读取request_id失败: {}", e)))?;
                let parsed = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::bad_request("request_id不是合法的UUID"))?;
                request_id = Some(parsed);
            }
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(format!("读取文件数据失败: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let request_id = request_id.ok_or_else(|| AppError::bad_request("缺少request_id字段"))?;
    let file_data = file_data.ok_or_else(|| AppError::bad_request("缺少文件数据"))?;
    let filename = filename.ok_or_else(|| AppError::bad_request("缺少文件名"))?;

    if file_data.is_empty() {
        return Err(AppError::validation("文件内容为空"));
    }

    // 归属请求必须存在，校验通过前不触碰存储后端
    let request_repository = RequestRepository::new(app_state.database.clone());
    if !request_repository.exists(request_id).await? {
        return Err(AppError::not_found(format!("购物请求 {}", request_id)));
    }

    let file_key = app_state
        .storage
        .upload(&request_id.to_string(), &file_data, &filename)
        .await?;

    tracing::info!(
        "附件上传完成: request={} filename={} key={}",
        request_id,
        filename,
        file_key
    );

    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository
        .create(CreateRequestAsset {
            request_id,
            file_key: file_key.clone(),
        })
        .await?;

    let url = app_state
        .storage
        .resolve_url(&file_key, DEFAULT_URL_EXPIRES_SECS)
        .await?;

    Ok(Json(ApiResponse::success(
        RequestAssetResponse::from_asset(asset, url),
    )))
}

/// 基于已有存储键登记附件
///
/// 文件已经通过其他渠道进入存储后端时使用，只做记录不做上传。
#[utoipa::path(
    post,
    path = "/request-assets/",
    tag = "request-assets",
    request_body = CreateRequestAsset,
    responses(
        (status = 200, description = "登记成功", body = RequestAssetResponse),
        (status = 400, description = "file_key为空"),
        (status = 404, description = "购物请求不存在"),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn create_request_asset(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRequestAsset>,
) -> Result<Json<ApiResponse<RequestAssetResponse>>, AppError> {
    if payload.file_key.trim().is_empty() {
        return Err(AppError::bad_request("file_key不能为空"));
    }

    let request_repository = RequestRepository::new(app_state.database.clone());
    if !request_repository.exists(payload.request_id).await? {
        return Err(AppError::not_found(format!(
            "购物请求 {}",
            payload.request_id
        )));
    }

    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository.create(payload).await?;

    let url = app_state
        .storage
        .resolve_url(&asset.file_key, DEFAULT_URL_EXPIRES_SECS)
        .await?;

    Ok(Json(ApiResponse::success(
        RequestAssetResponse::from_asset(asset, url),
    )))
}

/// 列出附件
///
/// 每行的URL都在本次请求中重新解析，保证返回的链接在有效期内可用。
#[utoipa::path(
    get,
    path = "/request-assets/",
    tag = "request-assets",
    params(
        ("request_id" = Option<Uuid>, Query, description = "只列出指定购物请求的附件")
    ),
    responses(
        (status = 200, description = "查询成功", body = Vec<RequestAssetResponse>),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn list_request_assets(
    State(app_state): State<AppState>,
    Query(query): Query<ListAssetsQuery>,
) -> Result<Json<ApiResponse<Vec<RequestAssetResponse>>>, AppError> {
    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let assets = match query.request_id {
        Some(request_id) => asset_repository.list_by_request(request_id).await?,
        None => asset_repository.list().await?,
    };

    let mut responses = Vec::with_capacity(assets.len());
    for asset in assets {
        let url = app_state
            .storage
            .resolve_url(&asset.file_key, DEFAULT_URL_EXPIRES_SECS)
            .await?;
        responses.push(RequestAssetResponse::from_asset(asset, url));
    }

    Ok(Json(ApiResponse::success(responses)))
}

/// 查询附件详情
#[utoipa::path(
    get,
    path = "/request-assets/{request_asset_id}",
    tag = "request-assets",
    params(
        ("request_asset_id" = Uuid, Path, description = "附件ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = RequestAssetResponse),
        (status = 404, description = "附件不存在"),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn get_request_asset(
    State(app_state): State<AppState>,
    Path(request_asset_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RequestAssetResponse>>, AppError> {
    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository
        .find_by_id(request_asset_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("附件 {}", request_asset_id)))?;

    let url = app_state
        .storage
        .resolve_url(&asset.file_key, DEFAULT_URL_EXPIRES_SECS)
        .await?;

    Ok(Json(ApiResponse::success(
        RequestAssetResponse::from_asset(asset, url),
    )))
}

/// 更新附件记录
#[utoipa::path(
    put,
    path = "/request-assets/{request_asset_id}",
    tag = "request-assets",
    params(
        ("request_asset_id" = Uuid, Path, description = "附件ID")
    ),
    request_body = UpdateRequestAsset,
    responses(
        (status = 200, description = "更新成功", body = RequestAssetResponse),
        (status = 404, description = "附件或目标购物请求不存在"),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn update_request_asset(
    State(app_state): State<AppState>,
    Path(request_asset_id): Path<Uuid>,
    Json(payload): Json<UpdateRequestAsset>,
) -> Result<Json<ApiResponse<RequestAssetResponse>>, AppError> {
    // 改归属时先校验目标请求存在
    if let Some(new_request_id) = payload.request_id {
        let request_repository = RequestRepository::new(app_state.database.clone());
        if !request_repository.exists(new_request_id).await? {
            return Err(AppError::not_found(format!("购物请求 {}", new_request_id)));
        }
    }

    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository
        .update(request_asset_id, payload)
        .await?
        .ok_or_else(|| AppError::not_found(format!("附件 {}", request_asset_id)))?;

    let url = app_state
        .storage
        .resolve_url(&asset.file_key, DEFAULT_URL_EXPIRES_SECS)
        .await?;

    Ok(Json(ApiResponse::success(
        RequestAssetResponse::from_asset(asset, url),
    )))
}

/// 删除附件
///
/// 先删数据库记录，再尽力删除存储对象。存储侧删除失败只记日志，
/// 不影响接口返回，残留对象由后台清理兜底。
#[utoipa::path(
    delete,
    path = "/request-assets/{request_asset_id}",
    tag = "request-assets",
    params(
        ("request_asset_id" = Uuid, Path, description = "附件ID"),
        ("delete_from_storage" = Option<bool>, Query, description = "是否同时删除存储文件，默认true")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "附件不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_request_asset(
    State(app_state): State<AppState>,
    Path(request_asset_id): Path<Uuid>,
    Query(query): Query<DeleteAssetQuery>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository
        .find_by_id(request_asset_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("附件 {}", request_asset_id)))?;

    let deleted = asset_repository.delete(request_asset_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("附件 {}", request_asset_id)));
    }

    if query.delete_from_storage.unwrap_or(true) {
        if let Err(e) = app_state.storage.delete(&asset.file_key).await {
            tracing::warn!("删除存储文件失败: key={} 错误: {}", asset.file_key, e);
        }
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 获取附件签名URL
#[utoipa::path(
    get,
    path = "/request-assets/{request_asset_id}/signed-url",
    tag = "request-assets",
    params(
        ("request_asset_id" = Uuid, Path, description = "附件ID"),
        ("expiration" = Option<u64>, Query, description = "有效期（秒），默认3600")
    ),
    responses(
        (status = 200, description = "获取成功", body = SignedUrlResponse),
        (status = 404, description = "附件不存在"),
        (status = 502, description = "存储后端错误")
    )
)]
pub async fn get_request_asset_signed_url(
    State(app_state): State<AppState>,
    Path(request_asset_id): Path<Uuid>,
    Query(query): Query<SignedUrlQuery>,
) -> Result<Json<ApiResponse<SignedUrlResponse>>, AppError> {
    let expires_in = query.expiration.unwrap_or(DEFAULT_URL_EXPIRES_SECS);
    if expires_in == 0 {
        return Err(AppError::bad_request("expiration必须大于0"));
    }

    let asset_repository = RequestAssetRepository::new(app_state.database.clone());
    let asset = asset_repository
        .find_by_id(request_asset_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("附件 {}", request_asset_id)))?;

    let url = app_state.storage.resolve_url(&asset.file_key, expires_in).await?;

    Ok(Json(ApiResponse::success(SignedUrlResponse {
        request_asset_id,
        url,
        expires_in,
    })))
}
