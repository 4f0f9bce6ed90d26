//! Spreadsheet model used by the seeding workflow: a workbook is an ordered
//! list of named tabs, every tab is a matrix of text cells with the header at
//! row 0.

pub mod reconcile;
pub mod store;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tab {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Tab {
    pub fn new(name: impl Into<String>, header: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: vec![header.iter().map(|h| h.to_string()).collect()],
        }
    }

    /// Записывает значение, расширяя таблицу при необходимости
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.into();
    }

    pub fn append_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Строки данных (без заголовка)
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    tabs: Vec<Tab>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.name == name)
    }

    pub fn tab_mut(&mut self, name: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.name == name)
    }

    /// Добавляет вкладку; вкладка с тем же именем заменяется на месте
    pub fn push_tab(&mut self, tab: Tab) {
        match self.tabs.iter_mut().find(|t| t.name == tab.name) {
            Some(existing) => *existing = tab,
            None => self.tabs.push(tab),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_grows_the_grid() {
        let mut tab = Tab::new("roles", &["id", "name"]);
        tab.set_cell(3, 0, "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(tab.rows.len(), 4);
        assert_eq!(tab.rows[3], vec!["01ARZ3NDEKTSV4RRFFQ69G5FAV"]);
        assert!(tab.rows[2].is_empty());
        assert_eq!(tab.data_rows(), 3);
    }

    #[test]
    fn test_push_tab_replaces_same_name() {
        let mut sheet = Sheet::new();
        sheet.push_tab(Tab::new("roles", &["id"]));
        sheet.push_tab(Tab::new("companies", &["id"]));
        sheet.push_tab(Tab::new("roles", &["id", "name"]));
        assert_eq!(sheet.tabs().len(), 2);
        assert_eq!(sheet.tabs()[0].rows[0].len(), 2);
        assert!(sheet.tab("users").is_none());
    }
}
