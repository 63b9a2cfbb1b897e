// ==========================================
// 啤酒库存对账系统 - 订单流水线
// ==========================================
// 流程:
// 1. 解析库存表 → StockTable
// 2. 解析供应商目录 → SupplierDirectory
// 3. OrderComputer → PurchaseOrders
// 4. SummaryFormatter → 摘要
// 5. 导出文件
// 6. 通知: 标题 + 摘要, 再逐个发送 CSV 附件
// 失败策略:
// - 步骤 1-5 失败: 记录日志, 尽力发送失败通知, 返回错误
// - 通知失败: 只记录日志, 不影响本次运行结果
// ==========================================

use crate::config::AppConfig;
use crate::delivery::error::DeliveryResult;
use crate::delivery::exporter::{ExportedFiles, OrderExporter};
use crate::delivery::notifier::{notifier_from_config, Notifier};
use crate::domain::order::PurchaseOrders;
use crate::engine::{OrderComputer, SummaryFormatter};
use crate::i18n::t_in;
use crate::importer::{ImportError, StockTableBuilder, StockVocabulary, SupplierDirectory};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

// ==========================================
// RunOutcome - 单次运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub stock_rows: usize,
    pub cell_warnings: usize,
    pub supplier_records: usize,
    pub orders: PurchaseOrders,
    pub digest: String,
    pub files: ExportedFiles,
    pub notification_failures: usize,
}

pub struct OrderPipeline {
    config: AppConfig,
    builder: StockTableBuilder,
    computer: OrderComputer,
    formatter: SummaryFormatter,
    exporter: OrderExporter,
    notifier: Arc<dyn Notifier>,
}

impl OrderPipeline {
    /// 指定通知通道创建
    pub fn new(config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_vocabulary(config, StockVocabulary::default(), notifier)
    }

    /// 指定门店/关键词表创建
    pub fn with_vocabulary(
        config: AppConfig,
        vocabulary: StockVocabulary,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let builder = StockTableBuilder::new(vocabulary).with_max_scan(config.max_scan);
        let formatter = SummaryFormatter::new(config.locale.clone());
        let exporter = OrderExporter::new(config.out_dir.clone(), config.locale.clone());
        Self {
            config,
            builder,
            computer: OrderComputer::new(),
            formatter,
            exporter,
            notifier,
        }
    }

    /// 按配置选择通知通道创建
    pub fn from_config(config: AppConfig) -> DeliveryResult<Self> {
        let notifier = notifier_from_config(&config)?;
        Ok(Self::new(config, notifier))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 执行一次完整运行
    pub async fn run(&self, stock_path: &Path, suppliers_path: &Path) -> anyhow::Result<RunOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("order_run", run_id = %run_id);

        async move {
            let start = Instant::now();
            info!(
                stock = %stock_path.display(),
                suppliers = %suppliers_path.display(),
                notifier = self.notifier.name(),
                "开始处理库存"
            );

            let mut outcome = match self.process(run_id, stock_path, suppliers_path) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %format!("{:#}", e), "库存处理失败");
                    if let Some(import_err) = e.downcast_ref::<ImportError>() {
                        if !import_err.missing_roles().is_empty() {
                            warn!(missing = ?import_err.missing_roles(), "表头缺少必需列");
                        }
                    }
                    self.notify_failure(&e).await;
                    return Err(e);
                }
            };

            outcome.notification_failures = self.notify(&outcome).await;
            info!(
                order_lines = outcome.orders.total_lines(),
                missing_suppliers = outcome.orders.missing_suppliers.len(),
                notification_failures = outcome.notification_failures,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "库存处理完成"
            );
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// 步骤 1-5（同步, 纯计算 + 本地文件）
    fn process(
        &self,
        run_id: Uuid,
        stock_path: &Path,
        suppliers_path: &Path,
    ) -> anyhow::Result<RunOutcome> {
        // === 步骤 1: 库存表 ===
        let stock_table = self
            .builder
            .build_from_path(stock_path)
            .with_context(|| format!("库存表处理失败: {}", stock_path.display()))?;
        if !stock_table.warnings.is_empty() {
            warn!(count = stock_table.warnings.len(), "部分单元格未识别出数量,已按 0 处理");
        }

        // === 步骤 2: 供应商目录 ===
        let directory = SupplierDirectory::load_path(suppliers_path)
            .with_context(|| format!("供应商目录处理失败: {}", suppliers_path.display()))?;

        // === 步骤 3-4: 计算 + 摘要 ===
        let orders = self.computer.compute(&stock_table, &directory);
        let digest = self.formatter.summarize_all(&orders);
        info!("摘要:\n{}", digest);

        // === 步骤 5: 导出 ===
        let files = self
            .exporter
            .export(&orders, &digest, run_id)
            .with_context(|| format!("导出失败: {}", self.exporter.out_dir().display()))?;

        Ok(RunOutcome {
            run_id,
            stock_rows: stock_table.rows.len(),
            cell_warnings: stock_table.warnings.len(),
            supplier_records: directory.len(),
            orders,
            digest,
            files,
            notification_failures: 0,
        })
    }

    /// 步骤 6: 发送摘要与附件, 返回失败次数
    async fn notify(&self, outcome: &RunOutcome) -> usize {
        let title = t_in(&self.config.locale, "digest.title", &[]);
        let mut failures = 0;

        if let Err(e) = self.notifier.send_message(&title, &outcome.digest).await {
            warn!(notifier = self.notifier.name(), error = %e, "摘要发送失败");
            failures += 1;
        }

        for path in outcome.files.attachments() {
            let caption = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Err(e) = self.notifier.send_document(path, &caption).await {
                warn!(notifier = self.notifier.name(), path = %path.display(), error = %e, "附件发送失败");
                failures += 1;
            }
        }
        failures
    }

    async fn notify_failure(&self, err: &anyhow::Error) {
        let title = t_in(&self.config.locale, "digest.title", &[]);
        let message = format!("{:#}", err);
        let body = t_in(&self.config.locale, "digest.failure", &[("error", message.as_str())]);
        if let Err(e) = self.notifier.send_message(&title, &body).await {
            warn!(error = %e, "失败通知发送失败");
        }
    }
}
