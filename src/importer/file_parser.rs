// ==========================================
// 啤酒库存对账系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.ods) / CSV (.csv, 分隔符 , 或 ;)
// 输出: 无表头原始二维表（表头位置由 HeaderResolver 决定）
// ==========================================

use crate::domain::types::RawCell;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

// ==========================================
// TableFormat - 表格格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel, // XLSX/XLS/ODS
}

impl TableFormat {
    /// 根据扩展名判断格式
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// 根据文件头魔数判断格式（无法识别时按 CSV）
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(ZIP_MAGIC) || data.starts_with(OLE2_MAGIC) {
            Self::Excel
        } else {
            Self::Csv
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

/// 分隔符嗅探的最大非空行数
const SNIFF_LINES: usize = 10;

impl CsvParser {
    /// 前若干非空行逐行投票: 每行中 ';' 与 ',' 较多者得一票
    ///
    /// 表头前的标题行常不含分隔符, 不参与投票; 平票时取 ','
    fn sniff_delimiter(text: &[u8]) -> u8 {
        let (mut semicolon_votes, mut comma_votes) = (0usize, 0usize);
        let lines = text
            .split(|b| *b == b'\n')
            .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
            .take(SNIFF_LINES);

        for line in lines {
            let semicolons = line.iter().filter(|b| **b == b';').count();
            let commas = line.iter().filter(|b| **b == b',').count();
            match semicolons.cmp(&commas) {
                std::cmp::Ordering::Greater => semicolon_votes += 1,
                std::cmp::Ordering::Less => comma_votes += 1,
                std::cmp::Ordering::Equal => {}
            }
        }

        if semicolon_votes > comma_votes {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, data: &[u8]) -> ImportResult<RawTable> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let delimiter = Self::sniff_delimiter(data);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(data);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(RawCell::from).collect::<Vec<_>>());
        }

        debug!(rows = rows.len(), delimiter = %(delimiter as char), "CSV 解析完成");
        Ok(RawTable::new(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表
pub struct ExcelParser;

impl ExcelParser {
    fn convert_cell(cell: &Data) -> RawCell {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) => RawCell::from(s.as_str()),
            other => RawCell::from(other.to_string().as_str()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, data: &[u8]) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<RawCell>> = range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect())
            .collect();

        debug!(sheet = %sheet_name, rows = rows.len(), "Excel 解析完成");
        Ok(RawTable::new(rows))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名/魔数自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解析文件（扩展名优先,未知扩展名时嗅探内容）
    pub fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        let format = match path.extension() {
            None => TableFormat::sniff(&data),
            Some(ext) => TableFormat::from_extension(path).ok_or_else(|| {
                ImportError::UnsupportedFormat(ext.to_string_lossy().to_string())
            })?,
        };
        self.parse_bytes(&data, Some(format))
    }

    /// 解析字节流
    pub fn parse_bytes(&self, data: &[u8], format: Option<TableFormat>) -> ImportResult<RawTable> {
        match format.unwrap_or_else(|| TableFormat::sniff(data)) {
            TableFormat::Csv => CsvParser.parse_bytes(data),
            TableFormat::Excel => ExcelParser.parse_bytes(data),
        }
    }
}
