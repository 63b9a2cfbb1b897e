// ==========================================
// 啤酒库存对账系统 - 表头定位器
// ==========================================
// 职责: 在原始表前若干行中定位表头行,并解析列角色
// 规则:
// - 自上而下扫描前 max_scan 行
// - 命中不同角色数 >= 3 的首行即表头
// - 找不到时退回第 0 行（尽力处理,不报错）
// - 列角色缺失 → MalformedSpreadsheet
// ==========================================

use crate::domain::stock::Location;
use crate::importer::column_resolver::{ColumnResolver, ColumnRole, StockVocabulary};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawTable;
use tracing::{debug, warn};

/// 默认扫描行数
pub const DEFAULT_MAX_SCAN: usize = 10;

/// 表头判定阈值（不同角色命中数）
pub const HEADER_HIT_THRESHOLD: usize = 3;

// ==========================================
// StockColumns - 库存表列位置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockColumns {
    pub product: usize,
    pub category: usize,
    pub locations: Vec<(Location, usize)>, // 按门店声明顺序
    pub limit: usize,
}

pub struct HeaderResolver {
    vocabulary: StockVocabulary,
    resolver: ColumnResolver,
}

impl HeaderResolver {
    pub fn new(vocabulary: StockVocabulary) -> Self {
        let resolver = vocabulary.resolver();
        Self {
            vocabulary,
            resolver,
        }
    }

    pub fn vocabulary(&self) -> &StockVocabulary {
        &self.vocabulary
    }

    /// 定位表头行
    pub fn find_header_row(&self, table: &RawTable, max_scan: usize) -> usize {
        for (idx, row) in table.rows.iter().take(max_scan).enumerate() {
            let cells: Vec<String> = row.iter().map(|c| c.as_text()).collect();
            let keys = ColumnResolver::header_keys(&cells);
            let hits = self.resolver.count_role_hits(&keys);
            if hits >= HEADER_HIT_THRESHOLD {
                debug!(row = idx, hits = hits, "定位到表头行");
                return idx;
            }
        }

        warn!(max_scan = max_scan, "前若干行未定位到表头,退回第 0 行");
        0
    }

    /// 解析表头行的列角色
    pub fn resolve_columns<S: AsRef<str>>(&self, headers: &[S]) -> ImportResult<StockColumns> {
        let resolved = self.resolver.resolve(headers);
        if !resolved.is_complete() {
            return Err(ImportError::MalformedSpreadsheet {
                missing: resolved.missing,
                found: found_columns(headers),
            });
        }

        let column = |role: &ColumnRole| {
            resolved.get(role).ok_or_else(|| {
                ImportError::InternalError(format!("列角色未解析: {}", role))
            })
        };

        let mut locations = Vec::with_capacity(self.vocabulary.locations.len());
        for location in &self.vocabulary.locations {
            let idx = column(&ColumnRole::LocationStock(location.id.clone()))?;
            locations.push((location.clone(), idx));
        }

        Ok(StockColumns {
            product: column(&ColumnRole::Product)?,
            category: column(&ColumnRole::Category)?,
            locations,
            limit: column(&ColumnRole::Limit)?,
        })
    }
}

impl Default for HeaderResolver {
    fn default() -> Self {
        Self::new(StockVocabulary::default())
    }
}

/// 表头中实际存在的非空列名（错误诊断用）
pub(crate) fn found_columns<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    headers
        .iter()
        .map(|h| h.as_ref().trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}
