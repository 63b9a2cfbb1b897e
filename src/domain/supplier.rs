// ==========================================
// 啤酒库存对账系统 - 供应商领域模型
// ==========================================
// 职责: 供应商目录记录 / 匹配结果
// 红线: "未知供应商" 是显式变体,哨兵字符串只在展示时出现
// ==========================================

use serde::{Deserialize, Serialize};

/// 未匹配到供应商时的展示名称
pub const UNKNOWN_SUPPLIER: &str = "Невідомий постачальник";

// ==========================================
// SupplierRecord - 供应商目录记录
// ==========================================
// pack_size: 最小起订倍数, 恒 >= 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub product_name: String,
    pub supplier_name: String,
    pub pack_size: u64,
}

// ==========================================
// SupplierMatch - 连接结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SupplierMatch {
    Known { supplier_name: String, pack_size: u64 },
    Unknown,
}

impl SupplierMatch {
    pub fn from_record(record: Option<&SupplierRecord>) -> Self {
        match record {
            Some(r) => SupplierMatch::Known {
                supplier_name: r.supplier_name.clone(),
                pack_size: r.pack_size.max(1),
            },
            None => SupplierMatch::Unknown,
        }
    }

    /// 展示名称（未知供应商使用哨兵）
    pub fn display_name(&self) -> &str {
        match self {
            SupplierMatch::Known { supplier_name, .. } => supplier_name,
            SupplierMatch::Unknown => UNKNOWN_SUPPLIER,
        }
    }

    /// 起订倍数（未知供应商按 1）
    pub fn pack_size(&self) -> u64 {
        match self {
            SupplierMatch::Known { pack_size, .. } => *pack_size,
            SupplierMatch::Unknown => 1,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SupplierMatch::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_supplier_defaults() {
        let m = SupplierMatch::from_record(None);
        assert!(m.is_unknown());
        assert_eq!(m.display_name(), UNKNOWN_SUPPLIER);
        assert_eq!(m.pack_size(), 1);
    }

    #[test]
    fn test_known_supplier_guards_pack_size() {
        let record = SupplierRecord {
            product_name: "Солод".to_string(),
            supplier_name: "Агро".to_string(),
            pack_size: 0,
        };
        let m = SupplierMatch::from_record(Some(&record));
        assert_eq!(m.display_name(), "Агро");
        assert_eq!(m.pack_size(), 1);
    }
}
