// ==========================================
// 啤酒库存对账系统 - 库存表构建器
// ==========================================
// 职责: 原始表 → 标准化库存表
// 流程: 表头定位 → 列映射 → 数值解析 → 单店上限派生 → 单位派生
// 规则:
// - limit_per_location = ceil(limit / 门店数)
// - 单位优先级: 上限单位 > 按门店顺序首个单位 > шт
// - 无商品名的行丢弃; 零库存/零上限行保留
// ==========================================

use crate::domain::stock::{split_limit, CellWarning, Location, StockRow, StockTable};
use crate::domain::types::{ParsedValue, RawCell, Unit};
use crate::importer::column_resolver::StockVocabulary;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{TableFormat, UniversalFileParser};
use crate::importer::header_resolver::{HeaderResolver, StockColumns, DEFAULT_MAX_SCAN};
use crate::importer::importer_trait::{DataCleaner as _, RawTable};
use crate::importer::value_parser::ValueParser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct StockTableBuilder {
    header_resolver: HeaderResolver,
    value_parser: ValueParser,
    cleaner: DataCleaner,
    max_scan: usize,
}

impl StockTableBuilder {
    pub fn new(vocabulary: StockVocabulary) -> Self {
        Self {
            header_resolver: HeaderResolver::new(vocabulary),
            value_parser: ValueParser::new(),
            cleaner: DataCleaner,
            max_scan: DEFAULT_MAX_SCAN,
        }
    }

    /// 调整表头扫描行数
    pub fn with_max_scan(mut self, max_scan: usize) -> Self {
        self.max_scan = max_scan;
        self
    }

    /// 从文件构建
    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<StockTable> {
        let table = UniversalFileParser.parse_path(path)?;
        self.build(&table)
    }

    /// 从字节流构建（格式未知时按魔数嗅探）
    pub fn build_from_bytes(
        &self,
        data: &[u8],
        format: Option<TableFormat>,
    ) -> ImportResult<StockTable> {
        let table = UniversalFileParser.parse_bytes(data, format)?;
        self.build(&table)
    }

    /// 从原始二维表构建
    #[instrument(skip(self, table), fields(raw_rows = table.len()))]
    pub fn build(&self, table: &RawTable) -> ImportResult<StockTable> {
        let locations = self.header_resolver.vocabulary().locations.clone();
        if table.is_empty() {
            info!("库存表为空");
            return Ok(StockTable {
                locations,
                ..StockTable::default()
            });
        }

        // === 步骤 1: 表头定位 + 列映射 ===
        let header_idx = self.header_resolver.find_header_row(table, self.max_scan);
        let headers: Vec<String> = table.rows[header_idx]
            .iter()
            .map(|c| self.cleaner.clean_text(&c.as_text()))
            .collect();
        let columns = self.header_resolver.resolve_columns(&headers)?;

        // === 步骤 2: 逐行解析 ===
        let location_count = columns.locations.len();
        let mut rows = Vec::new();
        let mut warnings = Vec::new();
        let mut skipped = 0usize;
        let empty = RawCell::Empty;

        for (offset, raw_row) in table.rows.iter().enumerate().skip(header_idx + 1) {
            let row_number = offset + 1;
            let cell = |col: usize| raw_row.get(col).unwrap_or(&empty);

            let product_text = cell(columns.product).as_text();
            let product_name = match self.cleaner.normalize_null(Some(product_text.as_str())) {
                Some(name) => name,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let category_text = cell(columns.category).as_text();
            let category = self
                .cleaner
                .normalize_null(Some(category_text.as_str()))
                .unwrap_or_default();

            let mut stock = BTreeMap::new();
            let mut location_units = Vec::with_capacity(location_count);
            for (location, col) in &columns.locations {
                let parsed =
                    self.parse_cell(cell(*col), row_number, &headers, *col, &mut warnings);
                stock.insert(location.id.clone(), parsed.amount());
                location_units.push(parsed.unit);
            }

            let limit = self.parse_cell(
                cell(columns.limit),
                row_number,
                &headers,
                columns.limit,
                &mut warnings,
            );
            let limit_total = limit.amount();

            rows.push(StockRow {
                row_number,
                product_name,
                category,
                stock,
                limit_total,
                limit_per_location: split_limit(limit_total, location_count),
                unit: resolve_unit(limit.unit, &location_units),
            });
        }

        info!(
            header_row = header_idx,
            rows = rows.len(),
            skipped = skipped,
            warnings = warnings.len(),
            "库存表构建完成"
        );

        Ok(StockTable {
            locations: columns_locations(&columns),
            rows,
            warnings,
        })
    }

    fn parse_cell(
        &self,
        raw: &RawCell,
        row_number: usize,
        headers: &[String],
        col: usize,
        warnings: &mut Vec<CellWarning>,
    ) -> ParsedValue {
        let parsed = self.value_parser.parse(raw);
        if parsed.quantity.is_none() && !raw.is_blank() {
            let column = headers.get(col).cloned().unwrap_or_default();
            debug!(row = row_number, column = %column, "单元格未识别出数量,按 0 计");
            warnings.push(CellWarning {
                row_number,
                column,
                raw_value: raw.as_text(),
            });
        }
        parsed
    }
}

impl Default for StockTableBuilder {
    fn default() -> Self {
        Self::new(StockVocabulary::default())
    }
}

/// 工作单位: 上限单位 > 门店顺序首个单位 > шт
pub fn resolve_unit(limit_unit: Option<Unit>, location_units: &[Option<Unit>]) -> Unit {
    limit_unit
        .or_else(|| location_units.iter().flatten().next().copied())
        .unwrap_or_default()
}

fn columns_locations(columns: &StockColumns) -> Vec<Location> {
    columns.locations.iter().map(|(loc, _)| loc.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;

    fn stock_table(rows: Vec<Vec<&str>>) -> RawTable {
        let mut all = vec![
            vec!["Залишки на 01.10", "", "", "", ""],
            vec![
                "Інгредієнти",
                "Категорія",
                "Склад Боголюбова",
                "Склад Європейська, 31а",
                "Ліміт",
            ],
        ];
        all.extend(rows);
        RawTable::from_strings(all)
    }

    #[test]
    fn test_build_basic_rows() {
        let table = stock_table(vec![
            vec!["Солод Pilsner", "Сировина", "3 кг", "1,5 кг", "11 кг"],
            vec!["Кеги  30л", "Тара", "2", "", "6 шт"],
        ]);
        let result = StockTableBuilder::default().build(&table).unwrap();

        assert_eq!(result.location_count(), 2);
        assert_eq!(result.rows.len(), 2);

        let malt = &result.rows[0];
        assert_eq!(malt.row_number, 3);
        assert_eq!(malt.product_name, "Солод Pilsner");
        assert_eq!(malt.stock_at("boholiubova"), 3.0);
        assert_eq!(malt.stock_at("yevropeiska_31a"), 1.5);
        assert_eq!(malt.limit_per_location, 6);
        assert_eq!(malt.unit, Unit::Kilograms);

        let kegs = &result.rows[1];
        assert_eq!(kegs.product_name, "Кеги 30л");
        assert_eq!(kegs.stock_at("yevropeiska_31a"), 0.0);
        assert_eq!(kegs.limit_per_location, 3);
        assert_eq!(kegs.unit, Unit::Pieces);
    }

    #[test]
    fn test_build_drops_rows_without_product() {
        let table = stock_table(vec![
            vec!["", "Сировина", "3", "1", "10"],
            vec!["nan", "", "", "", ""],
            vec!["Хміль", "", "0", "0", "0"],
        ]);
        let result = StockTableBuilder::default().build(&table).unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].product_name, "Хміль");
        assert_eq!(result.rows[0].limit_per_location, 0);
    }

    #[test]
    fn test_build_records_unparsed_cells() {
        let table = stock_table(vec![vec!["Дріжджі", "Сировина", "н/д", "2", "4"]]);
        let result = StockTableBuilder::default().build(&table).unwrap();

        assert_eq!(result.rows[0].stock_at("boholiubova"), 0.0);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].raw_value, "н/д");
        assert_eq!(result.warnings[0].column, "Склад Боголюбова");
    }

    #[test]
    fn test_build_empty_table() {
        let result = StockTableBuilder::default().build(&RawTable::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.location_count(), 2);
    }

    #[test]
    fn test_build_malformed_header() {
        let table = RawTable::from_strings(vec![vec!["x", "y"], vec!["1", "2"]]);
        let err = StockTableBuilder::default().build(&table).unwrap_err();
        assert!(matches!(err, ImportError::MalformedSpreadsheet { .. }));
    }

    #[test]
    fn test_resolve_unit_priority() {
        assert_eq!(
            resolve_unit(Some(Unit::Liters), &[Some(Unit::Pieces)]),
            Unit::Liters
        );
        assert_eq!(
            resolve_unit(None, &[None, Some(Unit::Kilograms)]),
            Unit::Kilograms
        );
        assert_eq!(resolve_unit(None, &[None, None]), Unit::Pieces);
    }
}
