//! vitrine: 生产者目录的分面浏览引擎
//!
//! 核心部分（`collate`、`catalog`、`engine`、`view`）都是纯计算，可以脱离终端测试；
//! `api` 负责一次性拉取整个集合，`config` 读取环境变量。
//! 其余模块是终端界面：`app_state` 处理按键与事件，`ui` 负责绘制，
//! `commands` 解析命令行，`app_service` 在后台执行加载。

pub mod api;
pub mod app_service;
pub mod app_state;
pub mod catalog;
pub mod collate;
pub mod commands;
pub mod config;
pub mod engine;
pub mod ui;
pub mod view;
