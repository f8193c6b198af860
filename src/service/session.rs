use crate::models::ShipmentRow;
use bigdecimal::BigDecimal;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 操作台表会话: 上传的表 + 其上的编辑
#[derive(Debug, Clone)]
pub struct TableSession {
    pub rows: Vec<ShipmentRow>,
}

/// 会话仓库: 显式的请求级状态对象, 取代模块级可变单例
pub struct SessionStore {
    sessions: DashMap<String, TableSession>,
    next_id: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn create(&self, rows: Vec<ShipmentRow>) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let session_id = format!("tbl-{}", id);
        self.sessions
            .insert(session_id.clone(), TableSession { rows });
        session_id
    }

    /// 生成/预览读取快照, 与并发编辑互不干扰
    pub fn rows(&self, session_id: &str) -> Option<Vec<ShipmentRow>> {
        self.sessions.get(session_id).map(|s| s.rows.clone())
    }

    /// 全局费率覆盖: 统一写入会话内每一行的单位体积费率
    pub fn apply_rate(&self, session_id: &str, rate: &BigDecimal) -> Option<usize> {
        self.sessions.get_mut(session_id).map(|mut session| {
            for row in session.rows.iter_mut() {
                row.per_charges = Some(rate.clone());
            }
            session.rows.len()
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
