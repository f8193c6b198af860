use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// 渲染错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("模板不存在: {0}")]
    TemplateMissing(String),

    #[error("文档写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 文档渲染能力: 字段表 → 落盘文档
///
/// 具体模板/版式技术可替换, 核心只依赖这一接口。
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        document_name: &str,
        fields: &IndexMap<String, String>,
    ) -> Result<PathBuf, RenderError>;
}

/// 文本模板渲染: 替换 {KEY.} 与 {KEY} 两种占位符, 顶部加发票号/日期块
#[derive(Debug)]
pub struct TemplateRenderer {
    template_path: PathBuf,
    output_dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new(
        template_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, RenderError> {
        let template_path = template_path.into();
        let output_dir = output_dir.into();

        if !template_path.exists() {
            return Err(RenderError::TemplateMissing(
                template_path.display().to_string(),
            ));
        }
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            template_path,
            output_dir,
        })
    }
}

impl DocumentRenderer for TemplateRenderer {
    fn render(
        &self,
        document_name: &str,
        fields: &IndexMap<String, String>,
    ) -> Result<PathBuf, RenderError> {
        // 每次渲染重读模板, 操作员可在运行中调整版式
        let mut body = fs::read_to_string(&self.template_path)?;

        for (key, value) in fields {
            body = body.replace(&format!("{{{}.}}", key), value);
            body = body.replace(&format!("{{{}}}", key), value);
        }

        let empty = String::new();
        let header = format!(
            "Invoice #: {}\nDate: {}\n\n",
            fields.get("INVOICE NUMBER").unwrap_or(&empty),
            fields.get("DATE").unwrap_or(&empty),
        );

        let output_path = self.output_dir.join(format!("{}.txt", document_name));
        fs::write(&output_path, format!("{}{}", header, body))?;

        Ok(output_path)
    }
}
