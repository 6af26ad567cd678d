use crate::error::Result;
use crate::models::ListingRecord;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H-%M-%S";

pub const SHEET_NAME: &str = "kufar";

pub const HEADERS: [&str; 5] = ["Название", "Цена", "Категория", "Состояние", "Ссылка"];

/// Column widths, in header order
const WIDTHS: [f64; 5] = [50.0, 15.0, 40.0, 10.0, 40.0];

/// Price and category are centred
const CENTERED: [bool; 5] = [false, true, true, false, false];

/// Export file name: `{label} ({timestamp}).xlsx`
pub fn export_file_name(label: &str, timestamp: NaiveDateTime) -> String {
    let stem: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{} ({}).xlsx", stem.trim(), timestamp.format(TIMESTAMP_FORMAT))
}

/// Write records as a single-sheet workbook into `dir`, creating it if needed
pub fn write_workbook(
    records: &[ListingRecord],
    dir: &Path,
    label: &str,
    timestamp: NaiveDateTime,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(label, timestamp));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let plain = Format::new();
    let centered = Format::new().set_align(FormatAlign::Center);
    let header = Format::new().set_bold().set_align(FormatAlign::Center);

    for (col, (title, width)) in HEADERS.iter().zip(WIDTHS).enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, *title, &header)?;
    }

    let format = |col: usize| if CENTERED[col] { &centered } else { &plain };

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string_with_format(row, 0, &record.title, format(0))?;
        match record.price.as_decimal() {
            Some(amount) => sheet.write_number_with_format(row, 1, amount, format(1))?,
            None => sheet.write_string_with_format(row, 1, record.price.to_string(), format(1))?,
        };
        sheet.write_string_with_format(row, 2, &record.category, format(2))?;
        sheet.write_string_with_format(row, 3, &record.condition, format(3))?;
        sheet.write_string_with_format(row, 4, &record.link, format(4))?;
    }

    workbook.save(&path)?;

    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(path)
}
