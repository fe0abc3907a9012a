//! Interactive todo list.
//!
//! Reads commands from stdin and draws each frame on stdout, either as
//! numbered rows or as the list container markup. Logs go to stderr.

use anyhow::Context;
use composable_todo_core::environment::SystemClock;
use composable_todo_runtime::metrics::register_metrics;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use todo::terminal::HELP_TEXT;
use todo::{
    parse_command, Command, Config, FileStorage, HtmlSurface, Surface, SurfaceKind,
    TerminalSurface, TodoApp, TodoEnvironment,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Interactive side of a surface: prompts, notices and per-frame output
trait Console: Surface {
    fn help(&mut self) -> io::Result<()>;
    fn notice(&mut self, message: &str) -> io::Result<()>;
    fn prompt(&mut self) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

impl<W: Write> Console for TerminalSurface<W> {
    fn help(&mut self) -> io::Result<()> {
        self.print_help()
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        Self::notice(self, message)
    }

    fn prompt(&mut self) -> io::Result<()> {
        Self::prompt(self)
    }

    fn present(&mut self) -> io::Result<()> {
        // Rows are printed as the surface is updated
        Ok(())
    }
}

impl Console for HtmlSurface {
    fn help(&mut self) -> io::Result<()> {
        io::stdout().lock().write_all(HELP_TEXT.as_bytes())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "<!-- {message} -->")
    }

    fn prompt(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, r#"<div class="filters">{}</div>"#, self.filter_bar_html())?;
        writeln!(out, r#"<ul id="todo-list">{}</ul>"#, self.list_html())?;
        writeln!(out, r#"<span id="remaining-count">{}</span>"#, self.remaining())?;
        out.flush()
    }
}

fn init_tracing(default_directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

async fn run<V: Console>(mut app: TodoApp<V>, shutdown_timeout: Duration) -> anyhow::Result<()> {
    app.surface_mut().present()?;
    app.surface_mut().prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let list = app.frame().await.list;
        match parse_command(&line, &list) {
            Ok(Command::Event(event)) => {
                app.dispatch(event).await?;
                app.surface_mut().present()?;
            },
            Ok(Command::Help) => app.surface_mut().help()?,
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {},
            Err(error) => app.surface_mut().notice(&error.to_string())?,
        }
        app.surface_mut().prompt()?;
    }

    app.shutdown(shutdown_timeout)
        .await
        .context("Pending writes did not finish")?;
    tracing::info!("Todo list closed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.log);
    register_metrics();

    tracing::info!(
        data_dir = %config.data_dir.display(),
        surface = ?config.surface,
        "Starting todo list"
    );

    let storage = FileStorage::open(&config.data_dir)
        .with_context(|| format!("Cannot open {}", config.data_dir.display()))?;
    let env = TodoEnvironment::production(Arc::new(SystemClock), Arc::new(storage));

    match config.surface {
        SurfaceKind::Terminal => {
            let mut surface = TerminalSurface::new(io::stdout());
            surface.notice("Type 'help' for commands.")?;
            let app = TodoApp::start(env, surface).await?;
            run(app, config.shutdown_timeout).await
        },
        SurfaceKind::Html => {
            let app = TodoApp::start(env, HtmlSurface::new()).await?;
            run(app, config.shutdown_timeout).await
        },
    }
}
