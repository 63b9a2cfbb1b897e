// ==========================================
// 啤酒库存对账系统 - 采购订单领域模型
// ==========================================
// 职责: 订单行 / 门店订单表 / 缺供应商清单
// 红线: 存在 OrderLine 即 order_qty > 0
// ==========================================

use crate::domain::stock::Location;
use crate::domain::supplier::SupplierMatch;
use crate::domain::types::Unit;
use serde::{Deserialize, Serialize};

// ==========================================
// OrderLine - 订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub location_id: String,
    pub product_name: String,
    pub category: String,
    pub unit: Unit,
    pub stock_qty: f64,
    pub limit_per_location: u64,
    pub pack_size: u64,
    pub order_qty: u64, // pack_size 的正整数倍
    pub supplier: SupplierMatch,
}

impl OrderLine {
    pub fn supplier_name(&self) -> &str {
        self.supplier.display_name()
    }
}

// ==========================================
// LocationOrder - 单门店订单表
// ==========================================
// 排序: (供应商展示名, 商品名) 升序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOrder {
    pub location: Location,
    pub lines: Vec<OrderLine>,
}

impl LocationOrder {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ==========================================
// MissingSupplierRow - 缺供应商清单行
// ==========================================
// 目录完整性报告,与是否需要下单无关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSupplierRow {
    pub product_name: String,
    pub category: String,
    pub unit: Unit,
}

// ==========================================
// PurchaseOrders - 一次计算的全部输出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrders {
    pub locations: Vec<LocationOrder>,
    pub missing_suppliers: Vec<MissingSupplierRow>,
}

impl PurchaseOrders {
    /// 按门店 id 查找订单表
    pub fn for_location(&self, location_id: &str) -> Option<&LocationOrder> {
        self.locations
            .iter()
            .find(|order| order.location.id == location_id)
    }

    pub fn total_lines(&self) -> usize {
        self.locations.iter().map(|order| order.lines.len()).sum()
    }
}
