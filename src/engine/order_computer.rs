// ==========================================
// 啤酒库存对账系统 - 采购订单计算引擎
// ==========================================
// 职责: 库存表 × 供应商目录 → 各门店订单表 + 缺供应商清单
// 算法（每门店 L, 每行 r）:
// 1. 按商品名精确连接供应商; 未匹配 → 未知供应商, 倍数 1
// 2. need = max(0, 单店上限 - 库存[L])
// 3. order = ceil(need / pack) * pack（need > 0 时）
// 4. order = 0 的行不输出
// 5. 按 (供应商展示名, 商品名) 升序
// 红线: 无状态引擎, 同输入同输出
// ==========================================

use crate::domain::order::{LocationOrder, MissingSupplierRow, OrderLine, PurchaseOrders};
use crate::domain::stock::{Location, StockRow, StockTable};
use crate::domain::supplier::SupplierMatch;
use crate::importer::supplier_directory::SupplierDirectory;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// OrderComputer - 采购订单计算引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderComputer;

impl OrderComputer {
    pub fn new() -> Self {
        Self
    }

    /// 计算全部门店订单与缺供应商清单
    #[instrument(skip(self, table, directory), fields(rows = table.rows.len(), locations = table.locations.len()))]
    pub fn compute(&self, table: &StockTable, directory: &SupplierDirectory) -> PurchaseOrders {
        // 连接一次,各门店共用
        let joined: Vec<(&StockRow, SupplierMatch)> = table
            .rows
            .iter()
            .map(|row| (row, SupplierMatch::from_record(directory.lookup(&row.product_name))))
            .collect();

        let locations: Vec<LocationOrder> = table
            .locations
            .iter()
            .map(|location| self.compute_location(location, &joined))
            .collect();

        let missing_suppliers = self.collect_missing(&joined);

        info!(
            order_lines = locations.iter().map(|o| o.lines.len()).sum::<usize>(),
            missing_suppliers = missing_suppliers.len(),
            "采购订单计算完成"
        );

        PurchaseOrders {
            locations,
            missing_suppliers,
        }
    }

    /// 单门店订单表
    fn compute_location(
        &self,
        location: &Location,
        joined: &[(&StockRow, SupplierMatch)],
    ) -> LocationOrder {
        let mut lines: Vec<OrderLine> = joined
            .iter()
            .filter_map(|(row, supplier)| {
                let stock_qty = row.stock_at(&location.id);
                let pack_size = supplier.pack_size();
                let order_qty = order_quantity(row.limit_per_location, stock_qty, pack_size);
                if order_qty == 0 {
                    return None;
                }
                Some(OrderLine {
                    location_id: location.id.clone(),
                    product_name: row.product_name.clone(),
                    category: row.category.clone(),
                    unit: row.unit,
                    stock_qty,
                    limit_per_location: row.limit_per_location,
                    pack_size,
                    order_qty,
                    supplier: supplier.clone(),
                })
            })
            .collect();

        lines.sort_by(|a, b| {
            a.supplier_name()
                .cmp(b.supplier_name())
                .then_with(|| a.product_name.cmp(&b.product_name))
        });

        debug!(location = %location.id, lines = lines.len(), "门店订单表完成");
        LocationOrder {
            location: location.clone(),
            lines,
        }
    }

    /// 缺供应商清单（按商品名去重,保持首次出现顺序）
    fn collect_missing(&self, joined: &[(&StockRow, SupplierMatch)]) -> Vec<MissingSupplierRow> {
        let mut seen = HashSet::new();
        joined
            .iter()
            .filter(|(_, supplier)| supplier.is_unknown())
            .filter(|(row, _)| seen.insert(row.product_name.clone()))
            .map(|(row, _)| MissingSupplierRow {
                product_name: row.product_name.clone(),
                category: row.category.clone(),
                unit: row.unit,
            })
            .collect()
    }
}

/// 单行下单量: 缺口向上取整到起订倍数
///
/// # 示例
/// - 上限 5, 库存 3, 倍数 4 → 缺口 2 → 下单 4
/// - 上限 5, 库存 7 → 缺口为负按 0 → 下单 0
///
/// 结果超出 u64 时封顶为不超过 `u64::MAX` 的最大整倍数
pub fn order_quantity(limit_per_location: u64, stock_qty: f64, pack_size: u64) -> u64 {
    let pack_size = pack_size.max(1);
    let need = (limit_per_location as f64 - stock_qty).max(0.0);
    if need <= 0.0 {
        return 0;
    }
    let max_order = u64::MAX - u64::MAX % pack_size;
    let packs = (need / pack_size as f64).ceil();
    if packs >= u64::MAX as f64 {
        return max_order;
    }
    (packs as u64).checked_mul(pack_size).unwrap_or(max_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::supplier::SupplierRecord;
    use crate::domain::types::Unit;
    use std::collections::BTreeMap;

    fn locations() -> Vec<Location> {
        vec![
            Location::new("a", "A", &["a"]),
            Location::new("b", "B", &["b"]),
        ]
    }

    fn row(name: &str, a: f64, b: f64, limit_total: f64) -> StockRow {
        let mut stock = BTreeMap::new();
        stock.insert("a".to_string(), a);
        stock.insert("b".to_string(), b);
        StockRow {
            row_number: 1,
            product_name: name.to_string(),
            category: "Сировина".to_string(),
            stock,
            limit_total,
            limit_per_location: crate::domain::stock::split_limit(limit_total, 2),
            unit: Unit::Pieces,
        }
    }

    fn supplier(product: &str, name: &str, pack_size: u64) -> SupplierRecord {
        SupplierRecord {
            product_name: product.to_string(),
            supplier_name: name.to_string(),
            pack_size,
        }
    }

    #[test]
    fn test_order_quantity_rounds_to_pack() {
        assert_eq!(order_quantity(5, 3.0, 4), 4);
        assert_eq!(order_quantity(5, 0.0, 4), 8);
        assert_eq!(order_quantity(5, 0.5, 1), 5);
        assert_eq!(order_quantity(5, 5.0, 4), 0);
        assert_eq!(order_quantity(5, 9.0, 1), 0);
        assert_eq!(order_quantity(5, 3.0, 0), 2);
    }

    #[test]
    fn test_order_quantity_saturates_at_u64_range() {
        let qty = order_quantity(u64::MAX, 0.0, 4);
        assert_eq!(qty, u64::MAX - 3);
        assert_eq!(qty % 4, 0);

        assert_eq!(order_quantity(u64::MAX, 3.0, 1), u64::MAX);
        assert_eq!(order_quantity(u64::MAX, 0.0, 0), u64::MAX);
    }

    #[test]
    fn test_compute_huge_limit_does_not_overflow() {
        let table = StockTable {
            locations: locations(),
            rows: vec![row("X", 3.0, 0.0, 4e19)],
            warnings: vec![],
        };
        let directory = SupplierDirectory::from_records(vec![supplier("X", "S", 4)]);
        let orders = OrderComputer::new().compute(&table, &directory);

        for location_id in ["a", "b"] {
            let order = orders.for_location(location_id).unwrap();
            assert_eq!(order.lines.len(), 1);
            assert_eq!(order.lines[0].limit_per_location, u64::MAX);
            assert_eq!(order.lines[0].order_qty % 4, 0);
            assert!(order.lines[0].order_qty > 0);
        }
    }

    #[test]
    fn test_compute_scenario_limit_ten_pack_four() {
        let table = StockTable {
            locations: locations(),
            rows: vec![row("X", 3.0, 5.0, 10.0)],
            warnings: vec![],
        };
        let directory = SupplierDirectory::from_records(vec![supplier("X", "S", 4)]);
        let orders = OrderComputer::new().compute(&table, &directory);

        let a = orders.for_location("a").unwrap();
        assert_eq!(a.lines.len(), 1);
        assert_eq!(a.lines[0].order_qty, 4);
        assert_eq!(a.lines[0].limit_per_location, 5);

        // 门店 B 库存已达上限
        assert!(orders.for_location("b").unwrap().is_empty());
        assert!(orders.missing_suppliers.is_empty());
    }

    #[test]
    fn test_compute_sorts_by_supplier_then_product() {
        let table = StockTable {
            locations: locations(),
            rows: vec![
                row("Хміль", 0.0, 0.0, 4.0),
                row("Солод", 0.0, 0.0, 4.0),
                row("Дріжджі", 0.0, 0.0, 4.0),
            ],
            warnings: vec![],
        };
        let directory = SupplierDirectory::from_records(vec![
            supplier("Хміль", "Бета", 1),
            supplier("Солод", "Альфа", 1),
            supplier("Дріжджі", "Бета", 1),
        ]);
        let orders = OrderComputer::new().compute(&table, &directory);
        let names: Vec<&str> = orders.locations[0]
            .lines
            .iter()
            .map(|l| l.product_name.as_str())
            .collect();

        assert_eq!(names, vec!["Солод", "Дріжджі", "Хміль"]);
    }

    #[test]
    fn test_compute_missing_suppliers_independent_of_demand() {
        let table = StockTable {
            locations: locations(),
            rows: vec![
                row("Кеги", 10.0, 10.0, 4.0),
                row("Кеги", 0.0, 0.0, 4.0),
                row("Солод", 0.0, 0.0, 4.0),
            ],
            warnings: vec![],
        };
        let directory = SupplierDirectory::from_records(vec![supplier("Солод", "Агро", 1)]);
        let orders = OrderComputer::new().compute(&table, &directory);

        assert_eq!(orders.missing_suppliers.len(), 1);
        assert_eq!(orders.missing_suppliers[0].product_name, "Кеги");

        let unknown = orders.locations[0]
            .lines
            .iter()
            .find(|l| l.product_name == "Кеги")
            .unwrap();
        assert!(unknown.supplier.is_unknown());
        assert_eq!(unknown.pack_size, 1);
    }

    #[test]
    fn test_compute_empty_table() {
        let table = StockTable {
            locations: locations(),
            ..StockTable::default()
        };
        let orders = OrderComputer::new().compute(&table, &SupplierDirectory::default());

        assert_eq!(orders.locations.len(), 2);
        assert!(orders.locations.iter().all(|o| o.is_empty()));
        assert!(orders.missing_suppliers.is_empty());
    }
}
