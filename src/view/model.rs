use crate::catalog::{Catalog, CommerceRow, ProducerCard};
use crate::engine::{self, CommerceSort, FacetOptions, PageInfo, ProducerSort, Query};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// 每个生产者一行
    #[default]
    Producers,
    /// 每个 (生产者, 商户) 一行
    Commerces,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Producers => ViewMode::Commerces,
            ViewMode::Commerces => ViewMode::Producers,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Producers => "Producteurs",
            ViewMode::Commerces => "Commerces",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producers" | "producteurs" | "p" => Ok(ViewMode::Producers),
            "commerces" | "companies" | "c" => Ok(ViewMode::Commerces),
            other => Err(format!("mode inconnu: {}", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 当前视图里由用户选择的全部状态
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// 去抖后已提交的搜索文本
    pub query: String,
    pub region: String,
    pub departments: Vec<String>,
    pub producer_sort: ProducerSort,
    pub commerce_sort: CommerceSort,
    /// 请求的页码，从 1 开始
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: ViewMode::default(),
            query: String::new(),
            region: String::new(),
            departments: Vec::new(),
            producer_sort: ProducerSort::default(),
            commerce_sort: CommerceSort::default(),
            page: 1,
        }
    }
}

impl ViewState {
    pub fn sort_key(&self) -> &'static str {
        match self.mode {
            ViewMode::Producers => self.producer_sort.as_str(),
            ViewMode::Commerces => self.commerce_sort.as_str(),
        }
    }

    pub fn sort_label(&self) -> &'static str {
        match self.mode {
            ViewMode::Producers => self.producer_sort.label(),
            ViewMode::Commerces => self.commerce_sort.label(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ViewItems {
    Producers(Vec<ProducerCard>),
    Commerces(Vec<CommerceRow>),
}

impl ViewItems {
    pub fn len(&self) -> usize {
        match self {
            ViewItems::Producers(v) => v.len(),
            ViewItems::Commerces(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            ViewItems::Producers(v) => v.iter().map(|p| p.key.as_str()).collect(),
            ViewItems::Commerces(v) => v.iter().map(|c| c.key.as_str()).collect(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            ViewItems::Producers(v) => v.iter().map(|p| p.name.as_str()).collect(),
            ViewItems::Commerces(v) => v.iter().map(|c| c.name.as_str()).collect(),
        }
    }
}

impl Default for ViewItems {
    fn default() -> Self {
        ViewItems::Producers(Vec::new())
    }
}

/// 每次重算后交给界面的只读结果
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub mode: ViewMode,
    pub items: ViewItems,
    pub page: PageInfo,
    pub facets: FacetOptions,
    pub region: String,
    pub departments: Vec<String>,
    pub sort_key: &'static str,
    pub sort_label: &'static str,
    pub query: String,
}

impl ViewModel {
    pub fn total_filtered(&self) -> usize {
        self.page.total_items
    }
}

/// 纯函数：同样的目录和状态永远得到同样的结果
pub fn derive_view(catalog: &Catalog, state: &ViewState, page_size: usize) -> ViewModel {
    let (items, page, facets) = match state.mode {
        ViewMode::Producers => {
            let r = engine::run_query(
                &catalog.producers,
                &Query {
                    text: &state.query,
                    region: &state.region,
                    departments: &state.departments,
                    sort: state.producer_sort,
                    page: state.page,
                    page_size,
                },
            );
            (ViewItems::Producers(r.items), r.page, r.facets)
        }
        ViewMode::Commerces => {
            let r = engine::run_query(
                &catalog.commerces,
                &Query {
                    text: &state.query,
                    region: &state.region,
                    departments: &state.departments,
                    sort: state.commerce_sort,
                    page: state.page,
                    page_size,
                },
            );
            (ViewItems::Commerces(r.items), r.page, r.facets)
        }
    };
    ViewModel {
        mode: state.mode,
        items,
        page,
        facets,
        region: state.region.clone(),
        departments: state.departments.clone(),
        sort_key: state.sort_key(),
        sort_label: state.sort_label(),
        query: state.query.clone(),
    }
}
