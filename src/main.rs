mod api;
mod app;
mod catalog;
mod config;
mod controller;
mod error;
mod logging;
mod pagination;
mod ui;

use app::{App, InputMode};
use catalog::{Card, Catalog, NOT_FOUND_MESSAGE, normalize_query};
use clap::{Parser, Subcommand};
use config::CatalogConfig;
use controller::{Controller, PassResult};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pagination::{Control, PageToken, PaginationState};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Browse the Pokémon catalog API from the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the catalog API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Entries per page
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Write TUI logs to this file instead of the cache directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive explorer (default)
    Run,
    /// Print one page of the catalog
    List {
        /// Page to print, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Look up a single entry by name or number
    Show {
        /// Name or number of the entry
        name: String,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut CatalogConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(per_page) = self.per_page {
            config.items_per_page = per_page;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load_from(path),
        None => CatalogConfig::load(),
    }
    .map_err(|e| e.user_message())?;
    cli.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    let command = cli.command.unwrap_or(Commands::Run);

    match command {
        Commands::Run => {
            let log_path = cli
                .log_file
                .or_else(CatalogConfig::default_log_path)
                .ok_or("Could not determine a log file location")?;
            logging::init_file(&log_path, &config.log_filter, cli.verbose)?;
            tracing::debug!(?config, "configuration loaded");
            tracing::info!(base_url = %config.base_url, per_page = config.items_per_page, "starting explorer");

            let catalog = Catalog::new(&config)?;
            let (results_tx, mut results_rx) = tokio::sync::mpsc::unbounded_channel();
            let controller = Controller::new(catalog, config.items_per_page, results_tx);

            // Create app
            let mut app = App::new(controller);
            app.init();

            // Init terminal
            let mut terminal = ratatui::init();
            crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

            let size = terminal.size()?;
            app.update_columns(size.width);

            // Main loop
            let result = run_app(&mut terminal, &mut app, &mut results_rx).await;

            // Restore terminal
            let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "explorer stopped");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::List { page } => {
            logging::init_stderr(&config.log_filter, cli.verbose);
            tracing::debug!(?config, "configuration loaded");
            print_page(&config, page).await?;
        }
        Commands::Show { name } => {
            logging::init_stderr(&config.log_filter, cli.verbose);
            tracing::debug!(?config, "configuration loaded");
            let Some(query) = normalize_query(&name) else {
                eprintln!("Error: a name or number is required");
                std::process::exit(1);
            };
            let catalog = Catalog::new(&config)?;
            match catalog.search(&query).await {
                Ok(Some(card)) => println!("{}", format_card(&card)),
                Ok(None) => println!("{NOT_FOUND_MESSAGE}"),
                Err(e) => {
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    results: &mut UnboundedReceiver<PassResult>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(result) = results.try_recv() {
            app.apply(result);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so finished passes show up promptly
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(app, mouse, Rect::new(0, 0, size.width, size.height));
                }
                Event::Resize(width, _) => {
                    app.update_columns(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Editing => handle_search_input(app, key),
        InputMode::Normal => handle_browse_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search.pop();
        }
        KeyCode::Char(c) => {
            app.search.push(c);
        }
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('r') => app.reload(),
        KeyCode::Left | KeyCode::Char('h') => app.step(PageToken::Previous),
        KeyCode::Right | KeyCode::Char('l') => app.step(PageToken::Next),
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter => app.activate_focused(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Esc => {
            app.focused = None;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, screen: Rect) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = ui::control_at(app, screen, mouse.column, mouse.row) {
                app.activate_control(index);
            }
        }
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::ScrollUp => app.scroll_up(),
        _ => {}
    }
}

async fn print_page(config: &CatalogConfig, page: u32) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::new(config)?;
    let mut state = PaginationState::new(config.items_per_page);
    state.current_page = page;

    let listing = match catalog.load_page(state.items_per_page, state.offset()).await {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };
    state.total_items = Some(listing.total_items);
    if let Err(msg) = check_page(&state, page) {
        eprintln!("Error: {msg}");
        std::process::exit(1);
    }

    for card in &listing.cards {
        println!("{}", format_card(card));
    }
    if let Some(total_pages) = state.total_pages() {
        println!();
        println!(
            "Page {} of {} ({} entries)",
            state.current_page,
            total_pages.max(1),
            listing.total_items
        );
    }
    let controls = state.controls();
    if !controls.is_empty() {
        println!("{}", format_controls(&controls));
    }
    Ok(())
}

/// Reject a `--page` past the end of the catalog.
fn check_page(state: &PaginationState, page: u32) -> Result<(), String> {
    if state.contains_page(page) {
        return Ok(());
    }
    let total_pages = state.total_pages().unwrap_or(0).max(1);
    Err(format!(
        "page {page} is out of range, the catalog has {total_pages} page{}",
        if total_pages == 1 { "" } else { "s" }
    ))
}

fn format_card(card: &Card) -> String {
    format!(
        "{:<6} {:<10} {:<16} {}",
        card.id, card.category, card.name, card.image
    )
}

/// `[n]` marks the current page, parentheses a disabled link.
fn format_controls(controls: &[Control]) -> String {
    controls
        .iter()
        .map(|c| {
            let label = c.token.label();
            if c.active {
                format!("[{label}]")
            } else if c.disabled {
                format!("({label})")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
