use crate::ingest::{self, IngestResult};
use crate::models::{ConsolidatedGroup, GenerateReport, ShipmentRow};
use crate::service::{consolidator, normalizer, InvoiceGenerator, SessionStore};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// 共享状态: 会话仓库 + 生成服务
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub generator: Arc<InvoiceGenerator>,
}

/// 请求体: 直接上传货运行
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub rows: Vec<ShipmentRow>,
}

/// 请求体: 导入服务器侧 CSV 文件
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub path: String,
}

/// 会话建立响应
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub session_id: Option<String>,
    pub row_count: usize,
}

/// 请求体: 全局费率覆盖
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub session_id: String,
    pub per_charges: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub success: bool,
    pub message: String,
}

/// 请求体: 合并预览
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub message: String,
    pub groups: Option<Vec<ConsolidatedGroup>>,
}

/// 请求体: 批量生成 (操作员提供上一张发票号)
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub session_id: String,
    pub last_invoice_number: u64,
}

/// 生成响应（含批次统计）
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<GenerateReport>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传货运行建立会话
pub async fn upload_table(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Response {
    let row_count = req.rows.len();
    let session_id = state.sessions.create(req.rows);
    tracing::info!("会话 {} 建立, {} 行", session_id, row_count);

    let response = SessionResponse {
        success: true,
        message: format!("Uploaded {} rows", row_count),
        session_id: Some(session_id),
        row_count,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 导入 CSV 建立会话 (列缺省 + 字段映射在此完成)
pub async fn import_table(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Response {
    match read_and_map(Path::new(&req.path)) {
        Ok(rows) => {
            let row_count = rows.len();
            let session_id = state.sessions.create(rows);
            tracing::info!("会话 {} 由 {} 导入, {} 行", session_id, req.path, row_count);

            let response = SessionResponse {
                success: true,
                message: format!("Imported {} rows from {}", row_count, req.path),
                session_id: Some(session_id),
                row_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = SessionResponse {
                success: false,
                message: format!("Error: {}", e),
                session_id: None,
                row_count: 0,
            };
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
    }
}

fn read_and_map(path: &Path) -> IngestResult<Vec<ShipmentRow>> {
    let mut table = ingest::read_shipment_table(path)?;
    normalizer::apply_column_defaults(&mut table);
    normalizer::map_rows(&table)
}

/// 全局费率覆盖: 统一应用到会话内每一行
pub async fn apply_rate(State(state): State<AppState>, Json(req): Json<RateRequest>) -> Response {
    match state.sessions.apply_rate(&req.session_id, &req.per_charges) {
        Some(updated) => {
            let response = RateResponse {
                success: true,
                message: format!("Applied per charge {} to {} rows", req.per_charges, updated),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => {
            let response = RateResponse {
                success: false,
                message: format!("Session {} not found", req.session_id),
            };
            (StatusCode::NOT_FOUND, Json(response)).into_response()
        }
    }
}

/// 合并预览: 规整 + 合并, 不分配发票号, 无副作用
pub async fn preview_table(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Response {
    let Some(rows) = state.sessions.rows(&req.session_id) else {
        let response = PreviewResponse {
            success: false,
            message: format!("Session {} not found", req.session_id),
            groups: None,
        };
        return (StatusCode::NOT_FOUND, Json(response)).into_response();
    };

    let normalized = normalizer::normalize_rows(&rows);
    match consolidator::consolidate(&normalized) {
        Ok(groups) => {
            let response = PreviewResponse {
                success: true,
                message: format!("{} customer groups", groups.len()),
                groups: Some(groups),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = PreviewResponse {
                success: false,
                message: format!("Error: {}", e),
                groups: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
        }
    }
}

/// 批量生成发票
pub async fn generate_invoices(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let Some(rows) = state.sessions.rows(&req.session_id) else {
        let response = GenerateResponse {
            success: false,
            message: format!("Session {} not found", req.session_id),
            report: None,
        };
        return (StatusCode::NOT_FOUND, Json(response)).into_response();
    };

    match state.generator.generate(&rows, req.last_invoice_number) {
        Ok(report) => {
            let response = GenerateResponse {
                success: true,
                message: format!(
                    "Generated {} invoices ({} failed) dated {}",
                    report.generated.len(),
                    report.failed.len(),
                    report.issue_date
                ),
                report: Some(report),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = GenerateResponse {
                success: false,
                message: format!("Error: {}", e),
                report: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
