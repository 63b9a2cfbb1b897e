// ==========================================
// 啤酒库存对账系统 - 供应商目录
// ==========================================
// 职责: 任意结构的供应商表 → (商品, 供应商, 起订倍数) 记录
// 规则:
// - 首个非空行为表头, 列角色按关键词匹配
// - 缺商品列或供应商列 → MalformedSupplierDirectory
// - 无起订倍数列 → 全部按 1
// - 起订倍数截断为整数, 非数字或 <= 0 → 1
// - 同一商品重复出现时以最后一条为准
// ==========================================

use crate::domain::supplier::SupplierRecord;
use crate::domain::types::RawCell;
use crate::importer::column_resolver::{ColumnRole, SupplierVocabulary};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{TableFormat, UniversalFileParser};
use crate::importer::header_resolver::found_columns;
use crate::importer::importer_trait::{DataCleaner as _, RawTable};
use crate::importer::value_parser::ValueParser;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct SupplierDirectory {
    records: Vec<SupplierRecord>,
    index: HashMap<String, usize>, // 商品名 → 最后一条记录位置
}

impl SupplierDirectory {
    /// 由已标准化的记录构建
    pub fn from_records(records: Vec<SupplierRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.product_name.clone(), idx))
            .collect();
        Self { records, index }
    }

    /// 从文件加载
    pub fn load_path<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let table = UniversalFileParser.parse_path(path)?;
        Self::normalize(&table)
    }

    /// 从字节流加载
    pub fn load_bytes(data: &[u8], format: Option<TableFormat>) -> ImportResult<Self> {
        let table = UniversalFileParser.parse_bytes(data, format)?;
        Self::normalize(&table)
    }

    /// 标准化原始供应商表（默认关键词表）
    pub fn normalize(table: &RawTable) -> ImportResult<Self> {
        Self::normalize_with(table, &SupplierVocabulary::default())
    }

    /// 标准化原始供应商表
    #[instrument(skip(table, vocabulary), fields(raw_rows = table.len()))]
    pub fn normalize_with(table: &RawTable, vocabulary: &SupplierVocabulary) -> ImportResult<Self> {
        let cleaner = DataCleaner;
        let value_parser = ValueParser::new();

        let header_idx = match table.rows.iter().position(|row| row.iter().any(|c| !c.is_blank())) {
            Some(idx) => idx,
            None => {
                return Err(ImportError::MalformedSupplierDirectory {
                    missing: vec![ColumnRole::Product, ColumnRole::Supplier],
                    found: Vec::new(),
                })
            }
        };

        let headers: Vec<String> = table.rows[header_idx]
            .iter()
            .map(|c| cleaner.clean_text(&c.as_text()))
            .collect();
        let resolved = vocabulary.resolver().resolve(&headers);
        let (product_col, supplier_col) = match (
            resolved.get(&ColumnRole::Product),
            resolved.get(&ColumnRole::Supplier),
        ) {
            (Some(p), Some(s)) => (p, s),
            _ => {
                return Err(ImportError::MalformedSupplierDirectory {
                    missing: resolved.missing,
                    found: found_columns(&headers),
                })
            }
        };
        let pack_col = resolved.get(&ColumnRole::PackSize);
        if pack_col.is_none() {
            info!("供应商目录无起订倍数列,全部按 1 处理");
        }

        let empty = RawCell::Empty;
        let mut records = Vec::new();
        for (offset, row) in table.rows.iter().enumerate().skip(header_idx + 1) {
            let cell = |col: usize| row.get(col).unwrap_or(&empty);

            let product_text = cell(product_col).as_text();
            let Some(product_name) = cleaner.normalize_null(Some(product_text.as_str())) else {
                continue;
            };
            let supplier_text = cell(supplier_col).as_text();
            let Some(supplier_name) = cleaner.normalize_null(Some(supplier_text.as_str())) else {
                warn!(row = offset + 1, product = %product_name, "供应商名称为空,跳过");
                continue;
            };

            let pack_size = pack_col
                .map(|col| coerce_pack_size(value_parser.parse(cell(col)).quantity))
                .unwrap_or(1);

            records.push(SupplierRecord {
                product_name,
                supplier_name,
                pack_size,
            });
        }

        let directory = Self::from_records(records);
        info!(
            records = directory.records.len(),
            products = directory.index.len(),
            "供应商目录加载完成"
        );
        Ok(directory)
    }

    /// 按商品名精确查找（重复商品取最后一条）
    pub fn lookup(&self, product_name: &str) -> Option<&SupplierRecord> {
        self.index
            .get(product_name)
            .and_then(|idx| self.records.get(*idx))
    }

    pub fn records(&self) -> &[SupplierRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 起订倍数: 截断为整数, 缺失或 < 1 时为 1
pub fn coerce_pack_size(quantity: Option<f64>) -> u64 {
    match quantity {
        Some(q) if q.is_finite() && q >= 1.0 => q.trunc() as u64,
        _ => 1,
    }
}
