//! 视图控制器：保存用户选择的状态，任何修改之后立即重算视图。
//!
//! 状态迁移规则：
//! - 切换视图模式：清空地区和省份、排序回到各自默认值、回到第 1 页，保留搜索文本；
//! - 修改地区：重算省份选项并剔除失效的已选省份，回到第 1 页；
//! - 其余过滤/排序修改：回到第 1 页，不动其他条件；
//! - 每次重算后把页码夹紧到总页数以内。

use super::debounce::Debouncer;
use super::model::{derive_view, ViewMode, ViewModel, ViewState};
use crate::catalog::Catalog;
use crate::engine::{
    self, facet_options, find_option, prune_departments, CommerceSort, FacetOptions, ProducerSort,
};
use log::{debug, info};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// 生效页码变化；界面据此把列表滚回顶部
    PageChanged { page: usize },
}

pub struct ViewController {
    catalog: Catalog,
    state: ViewState,
    raw_query: String,
    debouncer: Debouncer,
    page_size: usize,
    view: ViewModel,
    events: Vec<ViewEvent>,
}

impl ViewController {
    pub fn new(page_size: usize, debounce: Duration) -> Self {
        let mut controller = Self {
            catalog: Catalog::default(),
            state: ViewState::default(),
            raw_query: String::new(),
            debouncer: Debouncer::new(debounce),
            page_size: page_size.max(1),
            view: ViewModel::default(),
            events: Vec::new(),
        };
        controller.refresh();
        controller
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// 输入框里的原始文本（可能尚未提交）
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 取出待处理的事件
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// 替换整个目录（拉取完成）；保留已选条件，剔除失效省份
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        if !self.state.region.is_empty() {
            let regions = self.options_for("").regions;
            match find_option(&regions, &self.state.region) {
                Some(r) => self.state.region = r.clone(),
                None => self.state.region.clear(),
            }
        }
        self.prune_departments();
        self.refresh();
    }

    pub fn set_query_text(&mut self, text: impl Into<String>, now: Instant) {
        self.raw_query = text.into();
        self.debouncer.input(self.raw_query.clone(), now);
    }

    /// 主循环每轮调用；去抖到期时提交搜索文本，返回是否发生了重算
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.commit_query(query);
                true
            }
            None => false,
        }
    }

    /// 跳过去抖立即提交
    pub fn flush_query(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(query) => {
                self.commit_query(query);
                true
            }
            None => false,
        }
    }

    fn commit_query(&mut self, query: String) {
        debug!("query committed: {:?}", query);
        self.state.query = query;
        self.state.page = 1;
        self.refresh();
    }

    /// 设置地区；空串表示全部。返回 false 表示该地区不在选项中，状态不变。
    pub fn set_region(&mut self, region: &str) -> bool {
        let region = region.trim();
        let canonical = if region.is_empty() {
            String::new()
        } else {
            match find_option(&self.view.facets.regions, region) {
                Some(r) => r.clone(),
                None => return false,
            }
        };
        self.state.region = canonical;
        self.prune_departments();
        self.state.page = 1;
        self.refresh();
        true
    }

    /// 在“全部”和各个地区之间循环
    pub fn cycle_region(&mut self, forward: bool) {
        let mut options = vec![String::new()];
        options.extend(self.view.facets.regions.iter().cloned());
        let idx = options
            .iter()
            .position(|r| r == &self.state.region)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % options.len()
        } else {
            (idx + options.len() - 1) % options.len()
        };
        let region = options[next].clone();
        self.set_region(&region);
    }

    /// 勾选/取消一个省份；不在当前选项中的省份被忽略
    pub fn toggle_department(&mut self, department: &str) -> bool {
        let Some(option) = find_option(&self.view.facets.departments, department).cloned() else {
            return false;
        };
        if let Some(pos) = self.state.departments.iter().position(|d| d == &option) {
            self.state.departments.remove(pos);
        } else {
            self.state.departments.push(option);
        }
        self.state.page = 1;
        self.refresh();
        true
    }

    pub fn set_departments(&mut self, departments: Vec<String>) {
        self.state.departments = prune_departments(&departments, &self.view.facets.departments);
        self.state.page = 1;
        self.refresh();
    }

    pub fn clear_departments(&mut self) {
        self.set_departments(Vec::new());
    }

    pub fn set_producer_sort(&mut self, sort: ProducerSort) {
        self.state.producer_sort = sort;
        self.state.page = 1;
        self.refresh();
    }

    pub fn set_commerce_sort(&mut self, sort: CommerceSort) {
        self.state.commerce_sort = sort;
        self.state.page = 1;
        self.refresh();
    }

    /// 按当前模式解析排序键
    pub fn set_sort_by_name(&mut self, key: &str) -> Result<(), engine::UnknownSortKey> {
        match self.state.mode {
            ViewMode::Producers => self.set_producer_sort(key.parse()?),
            ViewMode::Commerces => self.set_commerce_sort(key.parse()?),
        }
        Ok(())
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        match self.state.mode {
            ViewMode::Producers => self.set_producer_sort(self.state.producer_sort.cycle(forward)),
            ViewMode::Commerces => self.set_commerce_sort(self.state.commerce_sort.cycle(forward)),
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.state.mode {
            return;
        }
        info!("view mode -> {:?}", mode);
        self.state = ViewState {
            mode,
            query: std::mem::take(&mut self.state.query),
            ..ViewState::default()
        };
        self.refresh();
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.state.mode.toggled());
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
        self.refresh();
    }

    pub fn next_page(&mut self) {
        if self.view.page.has_next() {
            self.set_page(self.view.page.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.view.page.has_prev() {
            self.set_page(self.view.page.page - 1);
        }
    }

    /// 清空搜索、地区和省份（排序与模式不变）
    pub fn clear_filters(&mut self) {
        self.raw_query.clear();
        self.debouncer.reset();
        self.state.query.clear();
        self.state.region.clear();
        self.state.departments.clear();
        self.state.page = 1;
        self.refresh();
    }

    fn options_for(&self, region: &str) -> FacetOptions {
        match self.state.mode {
            ViewMode::Producers => facet_options(&self.catalog.producers, region),
            ViewMode::Commerces => facet_options(&self.catalog.commerces, region),
        }
    }

    /// 按当前地区重算省份选项，剔除失效的已选省份
    fn prune_departments(&mut self) {
        if self.state.departments.is_empty() {
            return;
        }
        let options = self.options_for(&self.state.region).departments;
        let kept = prune_departments(&self.state.departments, &options);
        if kept.len() != self.state.departments.len() {
            debug!(
                "pruned departments {:?} -> {:?}",
                self.state.departments, kept
            );
        }
        self.state.departments = kept;
    }

    fn refresh(&mut self) {
        let previous = self.view.page.page;
        self.view = derive_view(&self.catalog, &self.state, self.page_size);
        // 结果变少时不让用户停在越界的页码上
        self.state.page = self.view.page.page;
        if self.view.page.page != previous {
            self.events.push(ViewEvent::PageChanged {
                page: self.view.page.page,
            });
        }
    }
}
