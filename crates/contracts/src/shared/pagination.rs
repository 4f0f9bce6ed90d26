use serde::{Deserialize, Serialize};

/// Параметры постраничного запроса (`?page=1&paginate=10`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub paginate: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_PAGINATE: u64 = 10;

    /// Номер страницы, начиная с 1
    pub fn page(&self) -> u64 {
        match self.page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        }
    }

    /// Размер страницы
    pub fn paginate(&self) -> u64 {
        match self.paginate {
            Some(p) if p >= 1 => p as u64,
            _ => Self::DEFAULT_PAGINATE,
        }
    }

    /// Смещение первой записи страницы; насыщается на `i64::MAX`,
    /// так как SQLite принимает OFFSET только как знаковое 64-битное
    pub fn offset(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.paginate())
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u64,
    pub paginate: u64,
    pub total_data: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(page: u64, paginate: u64, total_data: u64) -> Self {
        let total_pages = if paginate == 0 {
            0
        } else {
            total_data.div_ceil(paginate)
        };
        Self {
            page,
            paginate,
            total_data,
            total_pages,
        }
    }
}

/// Страница данных с метаинформацией
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.paginate(), 10);

        let q = PageQuery {
            page: Some(0),
            paginate: Some(-5),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.paginate(), 10);

        let q = PageQuery {
            page: Some(3),
            paginate: Some(25),
        };
        assert_eq!(q.page(), 3);
        assert_eq!(q.paginate(), 25);
    }

    #[test]
    fn test_page_query_offset() {
        let q = PageQuery {
            page: Some(3),
            paginate: Some(25),
        };
        assert_eq!(q.offset(), 50);
        assert_eq!(PageQuery::default().offset(), 0);

        let q = PageQuery {
            page: Some(i64::MAX),
            paginate: Some(10),
        };
        assert_eq!(q.offset(), i64::MAX as u64);

        let q = PageQuery {
            page: Some(i64::MAX),
            paginate: Some(i64::MAX),
        };
        assert_eq!(q.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_page_meta_total_pages() {
        assert_eq!(PageMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PageMeta::new(1, 10, 11).total_pages, 2);
        assert_eq!(PageMeta::new(2, 3, 7).total_pages, 3);
    }

    #[test]
    fn test_page_serializes_items_as_data() {
        let page = Page {
            items: vec![1, 2],
            meta: PageMeta::new(1, 2, 5),
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert_eq!(value["meta"]["total_pages"], 3);
    }
}
