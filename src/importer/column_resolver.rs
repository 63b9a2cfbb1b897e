// ==========================================
// 啤酒库存对账系统 - 列角色解析器
// ==========================================
// 职责: 源表头 → 标准列角色映射（声明式关键词表）
// 用途: 库存表表头定位/列映射 与 供应商目录列映射 共用
// 规则: 表头清洗后小写,包含任一关键词片段即命中
// ==========================================

use crate::domain::stock::Location;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::DataCleaner as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// ColumnRole - 标准列角色
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Product,
    Category,
    LocationStock(String), // 门店 id
    Limit,
    Supplier,
    PackSize,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Product => write!(f, "Інгредієнти"),
            ColumnRole::Category => write!(f, "Категорія"),
            ColumnRole::LocationStock(id) => write!(f, "Склад {}", id),
            ColumnRole::Limit => write!(f, "Ліміт"),
            ColumnRole::Supplier => write!(f, "Постачальник"),
            ColumnRole::PackSize => write!(f, "Кратність"),
        }
    }
}

// ==========================================
// RoleSpec - 单个角色的关键词定义
// ==========================================
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub role: ColumnRole,
    pub keywords: Vec<String>, // 小写片段
    pub required: bool,
}

impl RoleSpec {
    /// 已清洗的小写单元格是否命中本角色
    pub fn matches(&self, key: &str) -> bool {
        !key.is_empty() && self.keywords.iter().any(|k| key.contains(k.as_str()))
    }
}

// ==========================================
// ResolvedColumns - 列映射结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    pub columns: HashMap<ColumnRole, usize>,
    pub missing: Vec<ColumnRole>, // 仅必需角色
}

impl ResolvedColumns {
    pub fn get(&self, role: &ColumnRole) -> Option<usize> {
        self.columns.get(role).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

// ==========================================
// ColumnResolver - 声明式列角色解析
// ==========================================
// 红线: 一列只能归属一个角色（按表内顺序先到先得）
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    specs: Vec<RoleSpec>,
}

impl ColumnResolver {
    pub fn new(specs: Vec<RoleSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[RoleSpec] {
        &self.specs
    }

    /// 清洗表头单元格为匹配键
    pub fn header_keys<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
        let cleaner = DataCleaner;
        headers.iter().map(|h| cleaner.match_key(h.as_ref())).collect()
    }

    /// 统计一行中命中的不同角色数（表头定位用）
    pub fn count_role_hits(&self, keys: &[String]) -> usize {
        self.specs
            .iter()
            .filter(|spec| keys.iter().any(|k| spec.matches(k)))
            .count()
    }

    /// 将表头映射为列角色
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ResolvedColumns {
        let keys = Self::header_keys(headers);
        let mut claimed = vec![false; keys.len()];
        let mut resolved = ResolvedColumns::default();

        for spec in &self.specs {
            let hit = keys
                .iter()
                .enumerate()
                .find(|(idx, key)| !claimed[*idx] && spec.matches(key))
                .map(|(idx, _)| idx);

            match hit {
                Some(idx) => {
                    claimed[idx] = true;
                    resolved.columns.insert(spec.role.clone(), idx);
                }
                None if spec.required => resolved.missing.push(spec.role.clone()),
                None => {}
            }
        }

        resolved
    }
}

// ==========================================
// StockVocabulary - 库存表关键词表
// ==========================================
#[derive(Debug, Clone)]
pub struct StockVocabulary {
    pub product: Vec<String>,
    pub category: Vec<String>,
    pub limit: Vec<String>,
    pub locations: Vec<Location>,
}

impl Default for StockVocabulary {
    fn default() -> Self {
        Self {
            product: to_owned(&["інгредієн", "товар", "назва", "product"]),
            category: to_owned(&["категор", "category"]),
            limit: to_owned(&["ліміт", "лимит", "limit"]),
            locations: vec![
                Location::new("boholiubova", "Боголюбова", &["боголюб"]),
                Location::new("yevropeiska_31a", "Європейська, 31а", &["європейсь", "31а"]),
            ],
        }
    }
}

impl StockVocabulary {
    /// 使用自定义门店列表（其余关键词保持默认）
    pub fn with_locations(locations: Vec<Location>) -> Self {
        Self {
            locations,
            ..Self::default()
        }
    }

    pub fn resolver(&self) -> ColumnResolver {
        let mut specs = vec![
            role_spec(ColumnRole::Product, &self.product, true),
            role_spec(ColumnRole::Category, &self.category, true),
        ];
        for location in &self.locations {
            specs.push(role_spec(
                ColumnRole::LocationStock(location.id.clone()),
                &location.keywords,
                true,
            ));
        }
        specs.push(role_spec(ColumnRole::Limit, &self.limit, true));
        ColumnResolver::new(specs)
    }
}

// ==========================================
// SupplierVocabulary - 供应商目录关键词表
// ==========================================
// 顺序: 供应商列先于商品列,避免 "назва постачальника" 被误判为商品列
#[derive(Debug, Clone)]
pub struct SupplierVocabulary {
    pub product: Vec<String>,
    pub supplier: Vec<String>,
    pub pack_size: Vec<String>,
}

impl Default for SupplierVocabulary {
    fn default() -> Self {
        Self {
            product: to_owned(&["product", "товар", "інгредієнт", "назва"]),
            supplier: to_owned(&["supplier", "постач", "vendor"]),
            pack_size: to_owned(&["pack", "кратн", "упаков"]),
        }
    }
}

impl SupplierVocabulary {
    pub fn resolver(&self) -> ColumnResolver {
        ColumnResolver::new(vec![
            role_spec(ColumnRole::Supplier, &self.supplier, true),
            role_spec(ColumnRole::PackSize, &self.pack_size, false),
            role_spec(ColumnRole::Product, &self.product, true),
        ])
    }
}

fn role_spec(role: ColumnRole, keywords: &[String], required: bool) -> RoleSpec {
    RoleSpec {
        role,
        keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        required,
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_stock_headers() {
        let resolver = StockVocabulary::default().resolver();
        let headers = [
            "Інгредієнти",
            "Категорія",
            "Склад Боголюбова",
            "Склад Європейська, 31а",
            "Ліміт",
        ];
        let resolved = resolver.resolve(&headers);

        assert!(resolved.is_complete());
        assert_eq!(resolved.get(&ColumnRole::Product), Some(0));
        assert_eq!(resolved.get(&ColumnRole::Category), Some(1));
        assert_eq!(
            resolved.get(&ColumnRole::LocationStock("boholiubova".to_string())),
            Some(2)
        );
        assert_eq!(
            resolved.get(&ColumnRole::LocationStock("yevropeiska_31a".to_string())),
            Some(3)
        );
        assert_eq!(resolved.get(&ColumnRole::Limit), Some(4));
    }

    #[test]
    fn test_resolve_reports_missing_required() {
        let resolver = StockVocabulary::default().resolver();
        let resolved = resolver.resolve(&["Інгредієнти", "Ліміт"]);

        assert!(!resolved.is_complete());
        assert_eq!(resolved.missing.len(), 3);
        assert!(resolved.missing.contains(&ColumnRole::Category));
    }

    #[test]
    fn test_supplier_name_column_not_taken_as_product() {
        let resolver = SupplierVocabulary::default().resolver();
        let resolved = resolver.resolve(&["Назва постачальника", "Назва товару", "Кратність"]);

        assert_eq!(resolved.get(&ColumnRole::Supplier), Some(0));
        assert_eq!(resolved.get(&ColumnRole::Product), Some(1));
        assert_eq!(resolved.get(&ColumnRole::PackSize), Some(2));
    }

    #[test]
    fn test_optional_pack_size_not_missing() {
        let resolver = SupplierVocabulary::default().resolver();
        let resolved = resolver.resolve(&["product_name", "supplier_name"]);

        assert!(resolved.is_complete());
        assert_eq!(resolved.get(&ColumnRole::PackSize), None);
    }

    #[test]
    fn test_count_role_hits() {
        let resolver = StockVocabulary::default().resolver();
        let keys = ColumnResolver::header_keys(&["Інгредієнти", "Категорія", "", "Ліміт"]);
        assert_eq!(resolver.count_role_hits(&keys), 3);

        let keys = ColumnResolver::header_keys(&["Звіт", "01.10.2025"]);
        assert_eq!(resolver.count_role_hits(&keys), 0);
    }
}
