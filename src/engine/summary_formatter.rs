// ==========================================
// 啤酒库存对账系统 - 订单摘要格式化
// ==========================================
// 职责: 门店订单表 → 一行可读摘要（通知用）
// 规则:
// - 空表 → 固定 "无需订货" 文案
// - 按单位汇总下单量, 显示顺序 л → кг → шт
// - Top-3 按下单量降序, 同量保持表内顺序（稳定排序）
// - 整数不带小数点, 非整数保留两位小数
// ==========================================

use crate::domain::order::{LocationOrder, OrderLine, PurchaseOrders};
use crate::domain::types::Unit;
use crate::i18n::t_in;
use std::collections::BTreeMap;

/// Top 商品条数
pub const TOP_ITEMS: usize = 3;

#[derive(Debug, Clone)]
pub struct SummaryFormatter {
    locale: String,
}

impl SummaryFormatter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// 单门店摘要
    pub fn summarize(&self, order: &LocationOrder) -> String {
        let store = order.location.display_name.as_str();
        if order.is_empty() {
            return t_in(&self.locale, "digest.no_order", &[("store", store)]);
        }

        let totals = unit_totals(&order.lines)
            .into_iter()
            .map(|(unit, amount)| format!("{} {}", format_amount(amount), unit))
            .collect::<Vec<_>>()
            .join(", ");
        let top = top_products(&order.lines, TOP_ITEMS).join(", ");
        let count = order.lines.len().to_string();

        t_in(
            &self.locale,
            "digest.location_line",
            &[
                ("store", store),
                ("count", count.as_str()),
                ("totals", totals.as_str()),
                ("top", top.as_str()),
            ],
        )
    }

    /// 全部门店摘要（每店一行, 有缺供应商商品时追加一行）
    pub fn summarize_all(&self, orders: &PurchaseOrders) -> String {
        let mut lines: Vec<String> = orders.locations.iter().map(|o| self.summarize(o)).collect();

        if !orders.missing_suppliers.is_empty() {
            let count = orders.missing_suppliers.len().to_string();
            let products = orders
                .missing_suppliers
                .iter()
                .take(TOP_ITEMS)
                .map(|m| m.product_name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(t_in(
                &self.locale,
                "digest.missing_suppliers",
                &[("count", count.as_str()), ("products", products.as_str())],
            ));
        }

        lines.join("\n")
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new(crate::i18n::DEFAULT_LOCALE)
    }
}

/// 数量格式化: 整数无小数点, 其余两位小数
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// 按单位汇总下单量（BTreeMap 按 Unit 顺序: л, кг, шт）
fn unit_totals(lines: &[OrderLine]) -> BTreeMap<Unit, f64> {
    let mut totals = BTreeMap::new();
    for line in lines {
        *totals.entry(line.unit).or_insert(0.0) += line.order_qty as f64;
    }
    totals.retain(|_, amount| *amount > 0.0);
    totals
}

fn top_products(lines: &[OrderLine], limit: usize) -> Vec<&str> {
    let mut ranked: Vec<&OrderLine> = lines.iter().collect();
    ranked.sort_by(|a, b| b.order_qty.cmp(&a.order_qty));
    ranked
        .into_iter()
        .take(limit)
        .map(|l| l.product_name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::MissingSupplierRow;
    use crate::domain::stock::Location;
    use crate::domain::supplier::SupplierMatch;

    fn line(product: &str, unit: Unit, order_qty: u64) -> OrderLine {
        OrderLine {
            location_id: "a".to_string(),
            product_name: product.to_string(),
            category: String::new(),
            unit,
            stock_qty: 0.0,
            limit_per_location: order_qty,
            pack_size: 1,
            order_qty,
            supplier: SupplierMatch::Unknown,
        }
    }

    fn order(lines: Vec<OrderLine>) -> LocationOrder {
        LocationOrder {
            location: Location::new("a", "Боголюбова", &["боголюб"]),
            lines,
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.0), "12");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(2.5), "2.50");
        assert_eq!(format_amount(1.2), "1.20");
        assert_eq!(format_amount(1e19), "10000000000000000000");
    }

    #[test]
    fn test_summarize_empty() {
        let text = SummaryFormatter::new("uk").summarize(&order(vec![]));
        assert_eq!(
            text,
            "Магазин Боголюбова: замовлення не потрібне, усі позиції в межах ліміту."
        );
    }

    #[test]
    fn test_summarize_units_and_top() {
        let text = SummaryFormatter::new("uk").summarize(&order(vec![
            line("Кеги", Unit::Pieces, 4),
            line("Солод", Unit::Kilograms, 25),
            line("Сироп", Unit::Liters, 5),
            line("Хміль", Unit::Kilograms, 5),
        ]));

        assert_eq!(
            text,
            "Магазин Боголюбова: 4 позицій. Підсумок: 5 л, 30 кг, 4 шт. Топ: Солод, Сироп, Хміль."
        );
    }

    #[test]
    fn test_summarize_english() {
        let text = SummaryFormatter::new("en").summarize(&order(vec![line("Malt", Unit::Kilograms, 2)]));
        assert_eq!(text, "Store Боголюбова: 1 items. Total: 2 кг. Top: Malt.");
    }

    #[test]
    fn test_summarize_all_appends_missing_line() {
        let orders = PurchaseOrders {
            locations: vec![order(vec![])],
            missing_suppliers: vec![MissingSupplierRow {
                product_name: "Кеги".to_string(),
                category: "Тара".to_string(),
                unit: Unit::Pieces,
            }],
        };
        let text = SummaryFormatter::new("uk").summarize_all(&orders);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Без постачальника: 1 товарів (Кеги).");
    }
}
