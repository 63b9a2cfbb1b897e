// ==========================================
// 样例数据生成器
// ==========================================
// 用途: 生成库存表与供应商目录样例（手动运行 CLI 用）
// 输出: tests/fixtures/datasets/stock_sample.csv
//       tests/fixtures/datasets/suppliers_sample.csv
// 用法: cargo run --bin generate_sample_data [输出目录]
// ==========================================

use chrono::Local;
use csv::WriterBuilder;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 库存表表头（与门店导出格式一致）
const STOCK_HEADER: &[&str] = &[
    "Інгредієнти",
    "Категорія",
    "Склад Боголюбова",
    "Склад Європейська, 31а",
    "Ліміт",
];

// 商品样例: (商品, 分类, 门店A库存, 门店B库存, 合计上限, 供应商, 起订倍数)
const PRODUCTS: &[(&str, &str, &str, &str, &str, Option<&str>, u32)] = &[
    ("Солод Pilsner", "Сировина", "12 кг", "3,5 кг", "40 кг", Some("Агро Солод"), 25),
    ("Солод Munich", "Сировина", "0", "2 кг", "10 кг", Some("Агро Солод"), 5),
    ("Хміль Saaz", "Сировина", "0,4 кг", "0,1 кг", "2 кг", Some("Хмелярня"), 1),
    ("Хміль Cascade", "Сировина", "1 кг", "1 кг", "2 кг", Some("Хмелярня"), 1),
    ("Дріжджі US-05", "Сировина", "н/д", "6", "10", Some("Лабораторія"), 2),
    ("Кеги 30л", "Тара", "4 шт", "1 шт", "12 шт", None, 1),
    ("Сироп вишневий", "Інше", "2 л", "0,5 л", "8 л", None, 1),
    ("CO2 балон", "Обладнання", "1", "0", "4 шт", Some("Газсервіс"), 1),
    ("Пляшки 0,5", "Тара", "1 200 шт", "800 шт", "3 000 шт", Some("Склотара"), 500),
];

fn write_stock(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;

    // 表头前的说明行（验证表头定位）; 首行需带分隔符供嗅探
    let date_line = format!("Станом на {}", Local::now().format("%d.%m.%Y"));
    writer.write_record(["Залишки інгредієнтів", "", "", "", ""])?;
    writer.write_record([date_line.as_str(), "", "", "", ""])?;
    writer.write_record(STOCK_HEADER)?;

    for (product, category, stock_a, stock_b, limit, _, _) in PRODUCTS {
        writer.write_record([*product, *category, *stock_a, *stock_b, *limit])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_suppliers(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(["product_name", "supplier_name", "pack_size"])?;

    for (product, _, _, _, _, supplier, pack_size) in PRODUCTS {
        if let Some(supplier) = supplier {
            writer.write_record([*product, *supplier, pack_size.to_string().as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&output_dir)?;

    let stock_path = output_dir.join("stock_sample.csv");
    let suppliers_path = output_dir.join("suppliers_sample.csv");

    write_stock(&stock_path)?;
    write_suppliers(&suppliers_path)?;

    println!("✓ 库存表: {} ({} 条商品)", stock_path.display(), PRODUCTS.len());
    println!(
        "✓ 供应商目录: {} ({} 条记录)",
        suppliers_path.display(),
        PRODUCTS.iter().filter(|p| p.5.is_some()).count()
    );
    Ok(())
}
