use crate::ingest::LedgerError;
use crate::service::render::RenderError;
use thiserror::Error;

/// 生成流程错误类型
///
/// 组级错误一律携带客户标识与已分配的发票号, 便于定位。
#[derive(Error, Debug)]
pub enum GenerateError {
    // ===== 配置错误: 在处理任何组之前失败 =====
    #[error("没有任何带客户标识 (MARK) 的行, 无法合并")]
    NoCustomerMarks,

    // ===== 组级错误 =====
    #[error("渲染失败 (客户 {customer}, 发票号 {invoice_number}): {source}")]
    Render {
        customer: String,
        invoice_number: u64,
        #[source]
        source: RenderError,
    },

    #[error("台账追加失败 (客户 {customer}, 发票号 {invoice_number}): {source}")]
    Ledger {
        customer: String,
        invoice_number: u64,
        #[source]
        source: LedgerError,
    },
}
