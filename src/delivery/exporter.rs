// ==========================================
// 啤酒库存对账系统 - 订单导出
// ==========================================
// 职责: PurchaseOrders → 输出目录中的文件
// 产物:
// - PO_<门店id>.csv: 每个非空门店订单表一份
// - MISSING_SUPPLIERS.csv: 存在缺供应商商品时
// - report.json: 每次运行都写（订单 + 摘要 + 运行信息）
// 格式: CSV 以 UTF-8 BOM 开头, 表头按语言本地化
// 红线: 写出前清除上次运行留下的 PO_*.csv / MISSING_SUPPLIERS.csv
// ==========================================

use crate::delivery::error::DeliveryResult;
use crate::domain::order::{LocationOrder, MissingSupplierRow, PurchaseOrders};
use crate::engine::summary_formatter::format_amount;
use crate::i18n::t_in;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 缺供应商清单文件名
pub const MISSING_SUPPLIERS_FILE: &str = "MISSING_SUPPLIERS.csv";

/// 运行报告文件名
pub const REPORT_FILE: &str = "report.json";

/// 门店订单文件名
pub fn order_file_name(location_id: &str) -> String {
    format!("PO_{}.csv", location_id)
}

/// 是否为本模块写出的 CSV 产物
fn is_export_csv(file_name: &str) -> bool {
    file_name == MISSING_SUPPLIERS_FILE
        || (file_name.starts_with("PO_") && file_name.ends_with(".csv"))
}

// ==========================================
// ExportedFiles - 本次运行写出的文件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedFiles {
    pub order_files: Vec<PathBuf>,
    pub missing_suppliers: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ExportedFiles {
    /// 需要作为附件发送的 CSV（订单表在前, 缺供应商清单在后）
    pub fn attachments(&self) -> Vec<&Path> {
        self.order_files
            .iter()
            .map(PathBuf::as_path)
            .chain(self.missing_suppliers.as_deref())
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    locale: &'a str,
    digest: &'a str,
    total_lines: usize,
    orders: &'a PurchaseOrders,
}

pub struct OrderExporter {
    out_dir: PathBuf,
    locale: String,
}

impl OrderExporter {
    pub fn new(out_dir: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            locale: locale.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 写出全部产物
    #[instrument(skip(self, orders, digest), fields(out_dir = %self.out_dir.display()))]
    pub fn export(
        &self,
        orders: &PurchaseOrders,
        digest: &str,
        run_id: Uuid,
    ) -> DeliveryResult<ExportedFiles> {
        fs::create_dir_all(&self.out_dir)?;
        self.remove_stale_outputs()?;
        let mut exported = ExportedFiles::default();

        for order in orders.locations.iter().filter(|o| !o.is_empty()) {
            let path = self.out_dir.join(order_file_name(&order.location.id));
            self.write_location_order(&path, order)?;
            debug!(location = %order.location.id, lines = order.lines.len(), "门店订单已写出");
            exported.order_files.push(path);
        }

        if !orders.missing_suppliers.is_empty() {
            let path = self.out_dir.join(MISSING_SUPPLIERS_FILE);
            self.write_missing_suppliers(&path, &orders.missing_suppliers)?;
            exported.missing_suppliers = Some(path);
        }

        let path = self.out_dir.join(REPORT_FILE);
        self.write_report(&path, orders, digest, run_id)?;
        exported.report = Some(path);

        info!(
            order_files = exported.order_files.len(),
            missing_suppliers = exported.missing_suppliers.is_some(),
            "导出完成"
        );
        Ok(exported)
    }

    /// 删除旧的订单/缺供应商 CSV, 返回删除数量
    fn remove_stale_outputs(&self) -> DeliveryResult<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.out_dir)? {
            let entry = entry?;
            let is_stale = entry.file_type()?.is_file()
                && entry.file_name().to_str().is_some_and(is_export_csv);
            if is_stale {
                fs::remove_file(entry.path())?;
                debug!(path = %entry.path().display(), "已删除上次运行的产物");
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn header(&self, keys: &[&str]) -> Vec<String> {
        keys.iter().map(|key| t_in(&self.locale, key, &[])).collect()
    }

    fn csv_writer(&self, path: &Path) -> DeliveryResult<csv::Writer<File>> {
        let mut file = File::create(path)?;
        file.write_all(UTF8_BOM)?;
        Ok(csv::Writer::from_writer(file))
    }

    fn write_location_order(&self, path: &Path, order: &LocationOrder) -> DeliveryResult<()> {
        let mut writer = self.csv_writer(path)?;
        writer.write_record(self.header(&[
            "export.location",
            "export.supplier",
            "export.product",
            "export.category",
            "export.unit",
            "export.stock",
            "export.limit_per_location",
            "export.pack_size",
            "export.order_qty",
        ]))?;

        for line in &order.lines {
            writer.write_record([
                order.location.display_name.as_str(),
                line.supplier_name(),
                line.product_name.as_str(),
                line.category.as_str(),
                line.unit.symbol(),
                format_amount(line.stock_qty).as_str(),
                line.limit_per_location.to_string().as_str(),
                line.pack_size.to_string().as_str(),
                line.order_qty.to_string().as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_missing_suppliers(
        &self,
        path: &Path,
        missing: &[MissingSupplierRow],
    ) -> DeliveryResult<()> {
        let mut writer = self.csv_writer(path)?;
        writer.write_record(self.header(&["export.product", "export.category", "export.unit"]))?;
        for row in missing {
            writer.write_record([
                row.product_name.as_str(),
                row.category.as_str(),
                row.unit.symbol(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_report(
        &self,
        path: &Path,
        orders: &PurchaseOrders,
        digest: &str,
        run_id: Uuid,
    ) -> DeliveryResult<()> {
        let report = RunReport {
            run_id,
            generated_at: Utc::now(),
            locale: &self.locale,
            digest,
            total_lines: orders.total_lines(),
            orders,
        };
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &report)?;
        Ok(())
    }
}
