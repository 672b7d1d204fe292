use crate::app_service::LoadTicket;
use crate::catalog::{Catalog, CommerceRow, Producer, ProducerCard};
use crate::commands::app_command::HELP_TEXT;
use crate::commands::AppCommand;
use crate::engine::{CommerceSort, ProducerSort};
use crate::view::{ViewController, ViewEvent, ViewItems, ViewMode};
use crossterm::event::KeyCode;
use log::debug;
use ratatui::widgets::ListState;
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Screen {
    List,
    Detail,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    /// 逐键输入搜索文本，经去抖后生效
    Search,
    Command,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FocusArea {
    Facets, // 左侧省份勾选列表
    List,   // 主列表
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Error(String),
    CatalogLoaded {
        ticket: LoadTicket,
        producers: Vec<Producer>,
    },
    LoadFailed {
        ticket: LoadTicket,
        message: String,
    },
}

pub struct App {
    pub controller: ViewController,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub selected_index: usize,
    pub list_state: ListState,
    pub facet_index: usize,
    pub facet_state: ListState,
    pub detail_scroll: u16,
    pub command_input: String,
    /// 光标位置（按字符计）
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub loading: bool,
    pub load_ticket: LoadTicket,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

fn first_completion(candidates: &[&str], typed: &str) -> Option<String> {
    let typed_lower = typed.to_lowercase();
    candidates
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            lower.starts_with(&typed_lower) && lower != typed_lower
        })
        .map(|c| c.chars().skip(typed.chars().count()).collect())
}

impl App {
    pub fn new(
        controller: ViewController,
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["application démarrée".to_string()];
        log_messages.extend(startup_info);

        App {
            controller,
            screen: Screen::List,
            input_mode: InputMode::Normal,
            focus_area: FocusArea::List,
            selected_index: 0,
            list_state: {
                let mut s = ListState::default();
                s.select(Some(0));
                s
            },
            facet_index: 0,
            facet_state: ListState::default(),
            detail_scroll: 0,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            loading: false,
            load_ticket: LoadTicket::default(),
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    /// 发起（重新）加载；新批次号让在途的旧结果失效
    pub fn request_reload(&mut self) {
        self.load_ticket = self.load_ticket.next();
        self.loading = true;
        if self
            .cmd_tx
            .send(AppCommand::Load {
                ticket: self.load_ticket,
            })
            .is_err()
        {
            self.loading = false;
            self.add_log("✗ tâche de chargement indisponible".to_string());
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(msg) | AppEvent::Message(msg) => self.add_log(msg),
            AppEvent::Error(msg) => self.add_log(format!("✗ {}", msg)),
            AppEvent::CatalogLoaded { ticket, producers } => {
                if ticket != self.load_ticket {
                    debug!("dropping stale catalog load #{}", ticket.generation());
                    return;
                }
                self.loading = false;
                let count = producers.len();
                self.controller.set_catalog(Catalog::from_producers(producers));
                self.add_log(format!("✓ {} producteurs chargés", count));
                self.sync_view();
            }
            AppEvent::LoadFailed { ticket, message } => {
                if ticket != self.load_ticket {
                    debug!("dropping stale load failure #{}", ticket.generation());
                    return;
                }
                self.loading = false;
                self.controller.set_catalog(Catalog::default());
                self.add_log(format!("✗ {}", message));
                self.sync_view();
            }
        }
    }

    /// 主循环每轮调用：推进搜索去抖
    pub fn tick(&mut self, now: Instant) {
        if self.controller.tick(now) {
            self.sync_view();
        }
    }

    /// 处理控制器事件并把选中位置夹紧到当前页
    fn sync_view(&mut self) {
        for event in self.controller.take_events() {
            match event {
                ViewEvent::PageChanged { page } => {
                    debug!("page -> {}", page);
                    self.selected_index = 0;
                }
            }
        }
        let len = self.controller.view().items.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));

        let facets = self.controller.view().facets.departments.len();
        if self.facet_index >= facets {
            self.facet_index = facets.saturating_sub(1);
        }
        self.facet_state
            .select(if facets == 0 { None } else { Some(self.facet_index) });

        if len == 0 {
            self.screen = Screen::List;
        }
    }

    pub fn selected_producer(&self) -> Option<&ProducerCard> {
        match &self.controller.view().items {
            ViewItems::Producers(cards) => cards.get(self.selected_index),
            ViewItems::Commerces(_) => None,
        }
    }

    pub fn selected_commerce(&self) -> Option<&CommerceRow> {
        match &self.controller.view().items {
            ViewItems::Commerces(rows) => rows.get(self.selected_index),
            ViewItems::Producers(_) => None,
        }
    }

    /// 光标前后两段，用于渲染
    pub fn command_split(&self) -> (&str, &str) {
        self.command_input
            .split_at(byte_offset(&self.command_input, self.command_cursor))
    }

    /// 获取当前的补全建议
    pub fn get_completion_hint(&self) -> Option<String> {
        const COMMANDS: [&str; 10] = [
            "sort", "region", "dept", "page", "mode", "search", "clear", "reload", "help",
            "quit",
        ];
        let input = self.command_input.trim_start();
        if input.is_empty() {
            return None;
        }

        let Some((head, tail)) = input.split_once(' ') else {
            return first_completion(&COMMANDS, input);
        };
        let tail = tail.trim_start();
        let view = self.controller.view();
        match head {
            "sort" => {
                let keys: Vec<&str> = match self.controller.state().mode {
                    ViewMode::Producers => ProducerSort::ALL.iter().map(|s| s.as_str()).collect(),
                    ViewMode::Commerces => CommerceSort::ALL.iter().map(|s| s.as_str()).collect(),
                };
                first_completion(&keys, tail)
            }
            "mode" => first_completion(&["producers", "commerces"], tail),
            "region" if !tail.is_empty() => {
                let mut names: Vec<&str> = vec!["all"];
                names.extend(view.facets.regions.iter().map(String::as_str));
                first_completion(&names, tail)
            }
            "dept" if !tail.is_empty() => {
                let mut names: Vec<&str> = vec!["clear"];
                names.extend(view.facets.departments.iter().map(String::as_str));
                first_completion(&names, tail)
            }
            _ => None,
        }
    }

    /// 执行一条命令；返回 true 表示退出
    pub fn execute_command(&mut self, cmd: AppCommand, now: Instant) -> bool {
        match cmd {
            AppCommand::Sort(key) => {
                if let Err(e) = self.controller.set_sort_by_name(&key) {
                    self.add_log(format!("✗ {}", e));
                }
            }
            AppCommand::Region(None) => {
                self.controller.set_region("");
            }
            AppCommand::Region(Some(name)) => {
                if !self.controller.set_region(&name) {
                    self.add_log(format!("✗ région inconnue: {}", name));
                }
            }
            AppCommand::DeptToggle(name) => {
                if !self.controller.toggle_department(&name) {
                    self.add_log(format!("✗ département indisponible: {}", name));
                }
            }
            AppCommand::DeptClear => self.controller.clear_departments(),
            AppCommand::Page(n) => self.controller.set_page(n),
            AppCommand::Mode(mode) => {
                self.controller.set_view_mode(mode);
                self.screen = Screen::List;
                self.selected_index = 0;
            }
            AppCommand::Search(text) => {
                self.controller.set_query_text(text, now);
                self.controller.flush_query();
            }
            AppCommand::Clear => self.controller.clear_filters(),
            AppCommand::Reload => self.request_reload(),
            // 加载只由 request_reload 发往后台任务
            AppCommand::Load { ticket } => {
                debug!("ignoring load #{} issued as a command", ticket.generation());
            }
            AppCommand::Help => self.add_log(HELP_TEXT.to_string()),
            AppCommand::Quit => return true,
            AppCommand::Unknown(msg) => {
                if !msg.is_empty() {
                    self.add_log(format!("✗ {}", msg));
                }
            }
        }
        self.sync_view();
        false
    }

    fn leave_input(&mut self) {
        self.command_input.clear();
        self.command_cursor = 0;
        self.command_history_index = None;
        self.input_mode = InputMode::Normal;
    }

    fn handle_search_key(&mut self, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.controller.flush_query();
                self.input_mode = InputMode::Normal;
                self.sync_view();
            }
            KeyCode::Backspace => {
                let mut text = self.controller.raw_query().to_string();
                text.pop();
                self.controller.set_query_text(text, now);
            }
            KeyCode::Char(c) => {
                let mut text = self.controller.raw_query().to_string();
                text.push(c);
                self.controller.set_query_text(text, now);
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyCode, now: Instant) -> bool {
        let len = self.command_input.chars().count();
        match key {
            KeyCode::Enter => {
                let cmd_owned = self.command_input.trim().to_string();
                self.leave_input();
                if cmd_owned.is_empty() {
                    return false;
                }
                let app_cmd = AppCommand::from_str(&cmd_owned)
                    .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
                self.command_history.push(cmd_owned);
                return self.execute_command(app_cmd, now);
            }
            KeyCode::Esc => self.leave_input(),
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let at = byte_offset(&self.command_input, self.command_cursor);
                    self.command_input.insert_str(at, &hint);
                    self.command_cursor += hint.chars().count();
                }
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len() - 1,
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                self.command_input = self.command_history[next].clone();
                self.command_cursor = self.command_input.chars().count();
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                if i + 1 >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                } else {
                    self.command_history_index = Some(i + 1);
                    self.command_input = self.command_history[i + 1].clone();
                    self.command_cursor = self.command_input.chars().count();
                }
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    self.command_cursor -= 1;
                    let at = byte_offset(&self.command_input, self.command_cursor);
                    self.command_input.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.command_cursor < len {
                    let at = byte_offset(&self.command_input, self.command_cursor);
                    self.command_input.remove(at);
                }
            }
            KeyCode::Left => self.command_cursor = self.command_cursor.saturating_sub(1),
            KeyCode::Right => self.command_cursor = (self.command_cursor + 1).min(len),
            KeyCode::Home => self.command_cursor = 0,
            KeyCode::End => self.command_cursor = len,
            KeyCode::Char(c) => {
                let at = byte_offset(&self.command_input, self.command_cursor);
                self.command_input.insert(at, c);
                self.command_cursor += 1;
            }
            _ => {}
        }
        false
    }

    /// 返回 true 表示退出应用
    pub fn handle_key_event(&mut self, key: KeyCode, now: Instant) -> bool {
        match self.input_mode {
            InputMode::Command => return self.handle_command_key(key, now),
            InputMode::Search => {
                self.handle_search_key(key, now);
                return false;
            }
            InputMode::Normal => {}
        }

        // 正常模式下的按键处理
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.screen = Screen::List;
            }
            KeyCode::Char(':') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
            }
            KeyCode::Char('v') => {
                self.controller.toggle_view_mode();
                self.screen = Screen::List;
                self.selected_index = 0;
            }
            KeyCode::Char('s') => self.controller.cycle_sort(true),
            KeyCode::Char('S') => self.controller.cycle_sort(false),
            KeyCode::Char('r') => self.controller.cycle_region(true),
            KeyCode::Char('R') => self.controller.cycle_region(false),
            KeyCode::Char('n') | KeyCode::PageDown => self.controller.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => self.controller.prev_page(),
            KeyCode::Char('c') => self.controller.clear_filters(),
            KeyCode::F(5) => self.request_reload(),
            KeyCode::Tab => {
                self.focus_area = match self.focus_area {
                    FocusArea::Facets => FocusArea::List,
                    FocusArea::List => FocusArea::Facets,
                };
            }
            KeyCode::Up => {
                if self.screen == Screen::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else if self.focus_area == FocusArea::Facets {
                    self.facet_index = self.facet_index.saturating_sub(1);
                } else {
                    self.selected_index = self.selected_index.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if self.screen == Screen::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else if self.focus_area == FocusArea::Facets {
                    self.facet_index += 1;
                } else {
                    self.selected_index += 1;
                }
            }
            KeyCode::Char(' ') => {
                if self.focus_area == FocusArea::Facets {
                    let option = self
                        .controller
                        .view()
                        .facets
                        .departments
                        .get(self.facet_index)
                        .cloned();
                    if let Some(department) = option {
                        self.controller.toggle_department(&department);
                    }
                }
            }
            KeyCode::Enter => {
                if self.focus_area == FocusArea::List && !self.controller.view().items.is_empty() {
                    self.screen = Screen::Detail;
                    self.detail_scroll = 0;
                }
            }
            KeyCode::Char('x') | KeyCode::Esc => self.screen = Screen::List,
            _ => return false,
        }
        self.sync_view();
        false
    }
}
