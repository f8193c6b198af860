use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub invoice: InvoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 发票产物配置: 模板、输出目录、台账表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceConfig {
    pub template_path: String,
    pub output_dir: String,
    pub ledger_path: String,
}

impl AppConfig {
    /// 加载配置: 内置默认值 → 可选配置文件 → 环境变量覆盖
    ///
    /// 环境变量前缀 INVOICE, 层级用双下划线, 如 INVOICE__SERVER__PORT=9090。
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("invoice.template_path", "templates/invoice_template.txt")?
            .set_default("invoice.output_dir", "invoice_docs")?
            .set_default(
                "invoice.ledger_path",
                "invoice_docs/customer_notification_sheet.csv",
            )?
            .add_source(config::File::with_name("config/invoice").required(false))
            .add_source(config::Environment::with_prefix("INVOICE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
