// ============================================================================
// FolioView - Terminal portfolio dashboard
// ============================================================================
// TUI client for a portfolio-tracker backend: holdings table, asset
// allocation chart, and a sell dialog with live price lookup.
//
// The UI thread never performs network I/O. A background worker thread owns
// a tokio runtime and an HTTP client; the event loop talks to it over mpsc
// channels (commands out, results in).
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use folioview::api::{fetch_latest_price, submit_sell_order, SellOrder};
use folioview::app::{App, PriceOutcome, Tone};
use folioview::models::{AssetType, Holding};
use folioview::ui::{events::EventHandler, render};

/// Default backend base URL, overridable with FOLIOVIEW_API_URL.
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

// ============================================================================
// Worker protocol
// ============================================================================

/// Commands sent to the worker thread.
#[derive(Debug, Clone)]
enum AppCommand {
    /// Look up the latest price for an asset shown in the sell dialog.
    /// One command per dialog invocation, no retry, no cancellation.
    FetchPrice {
        asset_name: String,
        symbol: String,
        asset_type: AssetType,
    },

    /// Post a confirmed sell order to its form action.
    SubmitSell {
        asset_id: u64,
        asset_name: String,
        action_url: String,
        order: SellOrder,
    },
}

/// Results sent back by the worker thread.
#[derive(Debug)]
enum AppResult {
    /// The price lookup settled, one of three ways.
    PriceFetched {
        asset_name: String,
        outcome: PriceOutcome,
    },

    /// The backend accepted the sell order.
    SellSubmitted {
        asset_id: u64,
        asset_name: String,
        quantity: f64,
    },

    /// The sell order was rejected or never arrived.
    SellFailed { asset_name: String, error: String },
}

// ============================================================================
// Logging
// ============================================================================

/// Initializes file logging.
///
/// The TUI owns the terminal, so logs go to a daily-rotated file under the
/// platform data directory (ex: ~/.local/share/folioview/logs). Level is
/// controlled with RUST_LOG.
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("folioview")
        .join("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "folioview.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folioview=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {}", e);
    });

    let api_base =
        std::env::var("FOLIOVIEW_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    info!(api_base = %api_base, "FolioView starting up");

    let mut app = App::with_holdings(api_base.clone(), seed_holdings());

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, api_base);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Demo portfolio shown until the client grows a holdings endpoint.
fn seed_holdings() -> Vec<Holding> {
    vec![
        Holding::new(1, "Apple Inc.", "AAPL", AssetType::Stock, 12.0, 251.4),
        Holding::new(2, "Gold", "XAU/USD", AssetType::Commodity, 2.5, 2387.0),
        Holding::new(3, "Silver", "XAG/USD", AssetType::Commodity, 40.0, 28.6),
        Holding::new(4, "Euro Cash", "EUR/USD", AssetType::Forex, 3000.0, 1.09),
        Holding::new(5, "City Flat", "FLAT-01", AssetType::RealEstate, 1.0, 185000.0),
    ]
}

// ============================================================================
// Background worker
// ============================================================================

/// Worker thread executing API calls off the UI thread.
///
/// Owns its own tokio runtime and a shared HTTP client. Blocking on a
/// request here only blocks the worker; the UI keeps rendering.
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    api_base: String,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = ?e, "Failed to create worker runtime");
                return;
            }
        };
        let client = reqwest::Client::new();

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::FetchPrice {
                            asset_name,
                            symbol,
                            asset_type,
                        } => {
                            let result = runtime.block_on(fetch_latest_price(
                                &client, &api_base, &symbol, asset_type,
                            ));

                            let outcome = match result {
                                Ok(Some(price)) => {
                                    info!(symbol = %symbol, price, "Price fetched");
                                    PriceOutcome::Price(price)
                                }
                                Ok(None) => {
                                    info!(symbol = %symbol, "No price available");
                                    PriceOutcome::Unavailable
                                }
                                Err(e) => {
                                    error!(symbol = %symbol, error = ?e, "Price fetch error");
                                    PriceOutcome::Failed
                                }
                            };

                            let _ = result_tx.send(AppResult::PriceFetched {
                                asset_name,
                                outcome,
                            });
                        }

                        AppCommand::SubmitSell {
                            asset_id,
                            asset_name,
                            action_url,
                            order,
                        } => {
                            let result = runtime
                                .block_on(submit_sell_order(&client, &action_url, &order));

                            match result {
                                Ok(()) => {
                                    info!(asset = %asset_name, quantity = order.quantity, "Sell order accepted");
                                    let _ = result_tx.send(AppResult::SellSubmitted {
                                        asset_id,
                                        asset_name,
                                        quantity: order.quantity,
                                    });
                                }
                                Err(e) => {
                                    error!(asset = %asset_name, error = ?e, "Sell order failed");
                                    let _ = result_tx.send(AppResult::SellFailed {
                                        asset_name,
                                        error: e.to_string(),
                                    });
                                }
                            }
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event loop
// ============================================================================

/// Main loop: apply worker results, render, handle input, tick.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !app.is_running() {
            break;
        }

        // Worker results, non-blocking. Results are applied unconditionally:
        // a late price for a reopened dialog overwrites it (last write wins).
        match result_rx.try_recv() {
            Ok(AppResult::PriceFetched {
                asset_name,
                outcome,
            }) => {
                debug!(asset = %asset_name, ?outcome, "Applying price outcome");
                app.apply_price_outcome(&asset_name, outcome);
            }
            Ok(AppResult::SellSubmitted {
                asset_id,
                asset_name,
                quantity,
            }) => {
                app.apply_sell(asset_id, quantity);
                app.set_status_message(
                    format!("Sold {} units of {}", quantity, asset_name),
                    Tone::Success,
                );
            }
            Ok(AppResult::SellFailed { asset_name, error }) => {
                app.set_status_message(
                    format!("Sell of {} failed: {}", asset_name, error),
                    Tone::Danger,
                );
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected");
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Ok(event) = events.next() {
            handle_event(app, event, &command_tx);
        }

        app.tick();
    }

    Ok(())
}

/// Applies one input event to the application state.
fn handle_event(app: &mut App, event: folioview::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use folioview::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_enter_event, is_escape_event,
        is_quit_event, is_sell_event, is_tab_event, is_up_event, is_value_char_event, Event,
    };

    // Sell dialog captures everything while open
    if app.is_in_sell_dialog() {
        match &event {
            e if is_escape_event(e) => {
                debug!("User cancelled sell dialog");
                app.close_sell_dialog();
            }
            e if is_tab_event(e) => app.toggle_sell_focus(),
            e if is_backspace_event(e) => app.sell_input_backspace(),
            e if is_enter_event(e) => match app.sell_order() {
                Ok(order) => {
                    if let Some(dialog) = app.sell_dialog.as_ref() {
                        info!(asset = %dialog.asset_name, quantity = order.quantity, "User submitted sell order");
                        let _ = command_tx.send(AppCommand::SubmitSell {
                            asset_id: dialog.asset_id,
                            asset_name: dialog.asset_name.clone(),
                            action_url: dialog.form_action.clone(),
                            order,
                        });
                    }
                    app.set_status_message("Submitting sell order...".to_string(), Tone::Muted);
                    app.close_sell_dialog();
                }
                Err(e) => {
                    debug!(error = %e, "Sell order rejected by validation");
                    app.set_status_message(e.to_string(), Tone::Danger);
                }
            },
            e if is_value_char_event(e) => {
                if let Some(c) = get_char_from_event(&event) {
                    app.sell_input_char(c);
                }
            }
            _ => {}
        }
        return;
    }

    match &event {
        e if is_quit_event(e) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        e if is_up_event(e) => {
            app.cancel_quit();
            app.navigate_up();
        }
        e if is_down_event(e) => {
            app.cancel_quit();
            app.navigate_down();
        }

        // 's' or Enter: open the sell dialog and start the price lookup.
        // The dialog opens before the fetch settles; the lookup is dispatched
        // after the synchronous phase completed.
        e if is_sell_event(e) || is_enter_event(e) => {
            app.cancel_quit();
            if let Some(holding) = app.open_sell_dialog() {
                info!(asset = %holding.name, "User opened sell dialog");
                let _ = command_tx.send(AppCommand::FetchPrice {
                    asset_name: holding.name,
                    symbol: holding.symbol,
                    asset_type: holding.asset_type,
                });
            }
        }

        Event::Key(_) => {
            // Any other key cancels a pending quit confirmation
            app.cancel_quit();
        }

        _ => {}
    }
}

// ============================================================================
// Terminal setup / teardown
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Always restore the terminal, even when the loop returned an error.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
