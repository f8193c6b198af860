use axum::{
    routing::{get, post},
    Router,
};
use freight_invoice_rust::api::{self, AppState};
use freight_invoice_rust::{
    AppConfig, CsvLedgerSink, InvoiceGenerator, SessionStore, TemplateRenderer,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 渲染器与台账 (输出目录由渲染器创建)
    let renderer = TemplateRenderer::new(
        &config.invoice.template_path,
        &config.invoice.output_dir,
    )?;
    let ledger = CsvLedgerSink::new(&config.invoice.ledger_path);

    let state = AppState {
        sessions: Arc::new(SessionStore::new()),
        generator: Arc::new(InvoiceGenerator::new(Box::new(renderer), Box::new(ledger))),
    };

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/table/upload", post(api::upload_table))
        .route("/api/table/import", post(api::import_table))
        .route("/api/table/rate", post(api::apply_rate))
        .route("/api/table/preview", post(api::preview_table))
        .route("/api/invoice/generate", post(api::generate_invoices))
        .layer(ServiceBuilder::new())
        .with_state(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/table/upload     - 上传货运行建会话");
    info!("  POST /api/table/import     - 导入 CSV 表");
    info!("  POST /api/table/rate       - 全局费率覆盖");
    info!("  POST /api/table/preview    - 合并预览");
    info!("  POST /api/invoice/generate - 批量生成发票");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
