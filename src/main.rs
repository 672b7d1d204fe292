use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use vitrine::api::{AnySource, CatalogSource};
use vitrine::app_service::load_catalog;
use vitrine::app_state::{App, AppEvent};
use vitrine::commands::AppCommand;
use vitrine::config::AppConfig;
use vitrine::ui::draw;
use vitrine::view::ViewController;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 先加载 .env，日志目录也可能来自其中
    let env_loaded = dotenv::dotenv();
    let config = AppConfig::from_env().context("configuration invalide")?;

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("création de {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("création de {}", log_path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file))) // 终端归 TUI 所有，日志只写文件
        .filter_level(log::LevelFilter::Warn)
        .filter_module("vitrine", log::LevelFilter::Info)
        .init();

    let mut startup_info = Vec::new();
    match env_loaded {
        Ok(path) => startup_info.push(format!("✓ .env chargé: {}", path.display())),
        Err(_) => startup_info.push("⚠ pas de fichier .env, variables système utilisées".to_string()),
    }
    startup_info.push(format!("journal: {}", log_path.display()));
    info!("starting with {:?}", config);

    let source: Arc<dyn CatalogSource> =
        Arc::new(AnySource::from_config(&config).context("client HTTP")?);
    startup_info.push(format!("source: {}", source.describe()));

    // 核心 Channel：AppCommand 进，AppEvent 出
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // 后台 Actor：每个 Load 在独立任务中执行，结果带批次号返回
    let source_bg = Arc::clone(&source);
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AppCommand::Load { ticket } => {
                    let source = Arc::clone(&source_bg);
                    let tx = evt_tx.clone();
                    tokio::spawn(async move {
                        load_catalog(source.as_ref(), ticket, &tx).await;
                    });
                }
                AppCommand::Quit => break,
                other => {
                    warn!("actor ignoring {:?}", other);
                }
            }
        }
    });

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = ViewController::new(config.page_size, config.search_debounce);
    let mut app = App::new(controller, startup_info, cmd_tx, evt_rx);
    app.request_reload();

    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };
    let _ = app.cmd_tx.send(AppCommand::Quit);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("boucle d'interface")
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            app.handle_event(event);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code, Instant::now())
                {
                    return Ok(());
                }
            }
        }
    }
}
