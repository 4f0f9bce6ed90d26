use anyhow::Context;
use calamine::{open_workbook_auto, Reader};
use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use super::{Sheet, Tab};

/// Хранилище рабочей книги: читается целиком и целиком записывается обратно
pub trait SheetStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Sheet>;
    fn save(&self, sheet: &Sheet) -> anyhow::Result<()>;
}

/// Файл `.xlsx` на диске.
///
/// Значения ячеек пишутся строками, оформление исходного файла не сохраняется.
pub struct XlsxSheetStore {
    path: PathBuf,
}

impl XlsxSheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetStore for XlsxSheetStore {
    fn load(&self) -> anyhow::Result<Sheet> {
        let mut workbook = open_workbook_auto(&self.path)
            .with_context(|| format!("Failed to open workbook {}", self.path.display()))?;

        let mut sheet = Sheet::new();
        for name in workbook.sheet_names().to_owned() {
            let range = workbook
                .worksheet_range(&name)
                .with_context(|| format!("Failed to read tab '{}'", name))?;

            // Range starts at the first used cell, not at A1
            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
            for cells in range.rows() {
                let mut row: Vec<String> = vec![String::new(); col_offset];
                row.extend(cells.iter().map(|cell| cell.to_string().trim().to_string()));
                while row.last().is_some_and(|c| c.is_empty()) {
                    row.pop();
                }
                rows.push(row);
            }
            while rows.last().is_some_and(|r| r.is_empty()) {
                rows.pop();
            }

            let tab = Tab { name, rows };
            tracing::debug!("Loaded tab '{}' with {} data rows", tab.name, tab.data_rows());
            sheet.push_tab(tab);
        }
        Ok(sheet)
    }

    fn save(&self, sheet: &Sheet) -> anyhow::Result<()> {
        let mut workbook = Workbook::new();
        for tab in sheet.tabs() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&tab.name)?;
            for (r, row) in tab.rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    worksheet.write_string(r as u32, c as u16, value)?;
                }
            }
        }
        workbook
            .save(&self.path)
            .with_context(|| format!("Failed to save workbook {}", self.path.display()))?;
        tracing::info!("Workbook saved: {}", self.path.display());
        Ok(())
    }
}

/// Рабочая книга в памяти процесса
#[cfg(test)]
#[derive(Default)]
pub struct MemorySheetStore {
    sheet: Mutex<Sheet>,
}

#[cfg(test)]
impl MemorySheetStore {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet: Mutex::new(sheet),
        }
    }

    pub fn snapshot(&self) -> anyhow::Result<Sheet> {
        self.load()
    }
}

#[cfg(test)]
impl SheetStore for MemorySheetStore {
    fn load(&self) -> anyhow::Result<Sheet> {
        let guard = self
            .sheet
            .lock()
            .map_err(|_| anyhow::anyhow!("sheet store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, sheet: &Sheet) -> anyhow::Result<()> {
        let mut guard = self
            .sheet
            .lock()
            .map_err(|_| anyhow::anyhow!("sheet store lock poisoned"))?;
        *guard = sheet.clone();
        Ok(())
    }
}
