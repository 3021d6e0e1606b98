use cftrack::api::StudentApi;
use cftrack::app::{handlers, App, AppMessage};
use cftrack::cli::{parse_args, CliCommand};
use cftrack::config::Config;
use cftrack::export;
use cftrack::logging;
use cftrack::ui;

use color_eyre::Result;
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use tokio::sync::mpsc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("cftrack {}", VERSION);
            Ok(())
        }
        CliCommand::Export { path } => run_export(&path),
        CliCommand::RunTui => run_tui(),
    }
}

/// Headless export: fetch the student list once and write it to CSV.
fn run_export(path: &str) -> Result<()> {
    let config = Config::from_env();
    let runtime = tokio::runtime::Runtime::new()?;

    let api = StudentApi::new(&config.api_url);
    let students = runtime.block_on(api.list_students())?;
    export::write_csv_file(&students, Path::new(path))?;
    println!("Exported {} students to {}", students.len(), path);
    Ok(())
}

fn run_tui() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_env();
    logging::init(config.log_path.as_deref());

    // Setup panic hook to ensure terminal cleanup on panic
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        let mut app = App::new(&config);
        app.pump();
        run_app(&mut terminal, &mut app).await
    });

    restore_terminal(&mut terminal)?;
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Create async event stream for keyboard input
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    let mut last_refresh = tokio::time::Instant::now();

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.should_quit {
            return Ok(());
        }

        // Poll keyboard events and task messages together; the 16ms tick
        // drives status expiry and the auto-refresh timer.
        let timeout = tokio::time::sleep(std::time::Duration::from_millis(16));

        tokio::select! {
            _ = timeout => {
                app.tick();

                // Auto-refresh respects a runtime-adjustable interval,
                // so it is a deadline check rather than a fixed interval.
                if app.refresh_secs > 0
                    && last_refresh.elapsed().as_secs() >= app.refresh_secs
                {
                    last_refresh = tokio::time::Instant::now();
                    app.refresh_students();
                }
            }

            event_result = event_stream.next() => {
                if let Some(Ok(event)) = event_result {
                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            handlers::handle_key(app, key);
                        }
                        Event::Resize(_, _) => {
                            // Redraw happens at the top of the loop.
                        }
                        _ => {}
                    }
                }
            }

            message = recv_message(&mut message_rx) => {
                if let Some(message) = message {
                    app.handle_message(message);
                }
            }
        }
    }
}

/// Receive from the optional channel, pending forever if it was taken.
async fn recv_message(
    rx: &mut Option<mpsc::UnboundedReceiver<AppMessage>>,
) -> Option<AppMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Setup panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = execute!(io::stdout(), Show);
        original_hook(panic_info);
    }));
}

/// Restore terminal to normal mode
fn restore_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
