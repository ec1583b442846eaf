//! The bundled `vendas` sales dataset.
//!
//! Used by the `askadb-seed` binary to produce `data/vendas.parquet` and by
//! tests that need a real Parquet file on disk.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use datafusion::arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::parquet::arrow::ArrowWriter;

pub const SAMPLE_ROW_COUNT: usize = 40;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCTS: [&str; 2] = ["Product A", "Product B"];
const MONTHS: [&str; 5] = ["January", "February", "March", "April", "May"];

// (sales_amount, quantity) per month, region, product.
const FIGURES: [[(f64, i64); 8]; 5] = [
    [
        (15000.0, 100), (12000.0, 80), (18000.0, 120), (14000.0, 90),
        (16000.0, 110), (13000.0, 85), (17000.0, 115), (11000.0, 75),
    ],
    [
        (16000.0, 105), (13000.0, 85), (19000.0, 125), (15000.0, 95),
        (17000.0, 115), (14000.0, 90), (18000.0, 120), (12000.0, 80),
    ],
    [
        (17000.0, 110), (14000.0, 90), (20000.0, 130), (16000.0, 100),
        (18000.0, 120), (15000.0, 95), (19000.0, 125), (13000.0, 85),
    ],
    [
        (18000.0, 115), (15000.0, 95), (21000.0, 135), (17000.0, 105),
        (19000.0, 125), (16000.0, 100), (20000.0, 130), (14000.0, 90),
    ],
    [
        (19000.0, 120), (16000.0, 100), (22000.0, 140), (18000.0, 110),
        (20000.0, 130), (17000.0, 105), (21000.0, 135), (15000.0, 95),
    ],
];

pub fn sample_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("month", DataType::Utf8, false),
        Field::new("sales_amount", DataType::Float64, false),
        Field::new("quantity", DataType::Int64, false),
        Field::new("sale_date", DataType::Date32, false),
        Field::new("notes", DataType::Utf8, true),
    ]))
}

pub fn sample_batch() -> anyhow::Result<RecordBatch> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;

    let mut regions = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut products = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut months = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut amounts = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut quantities = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut dates = Vec::with_capacity(SAMPLE_ROW_COUNT);
    let mut notes = Vec::with_capacity(SAMPLE_ROW_COUNT);

    for (month_idx, month) in MONTHS.iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(2024, month_idx as u32 + 1, 15)
            .context("invalid sale date")?;
        let days = (date - epoch).num_days() as i32;

        for (slot, (amount, quantity)) in FIGURES[month_idx].iter().enumerate() {
            regions.push(REGIONS[slot / PRODUCTS.len()]);
            products.push(PRODUCTS[slot % PRODUCTS.len()]);
            months.push(*month);
            amounts.push(*amount);
            quantities.push(*quantity);
            dates.push(days);
            // Only the best seller of each month carries a note.
            notes.push((slot == 2).then_some("top seller"));
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(regions)),
        Arc::new(StringArray::from(products)),
        Arc::new(StringArray::from(months)),
        Arc::new(Float64Array::from(amounts)),
        Arc::new(Int64Array::from(quantities)),
        Arc::new(Date32Array::from(dates)),
        Arc::new(StringArray::from(notes)),
    ];

    Ok(RecordBatch::try_new(sample_schema(), columns)?)
}

/// Write the sample dataset to `path`, creating parent directories.
/// Returns the number of rows written.
pub fn write_sample_dataset(path: &Path) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let batch = sample_batch()?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    tracing::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(batch.num_rows())
}
