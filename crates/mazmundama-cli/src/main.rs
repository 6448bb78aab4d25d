mod app;

use anyhow::{Context, Result, bail};
use app::App;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mazmundama_config::Config;
use mazmundama_engine::{BookStore, DocumentKey, FsBookStore, HtmlPassthrough, process_upload};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

/// Process documents into a book store and browse their pages.
#[derive(Debug, Parser)]
#[command(name = "mazmundama-cli", version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    browse: BrowseArgs,
}

impl Cli {
    /// The chosen subcommand; browsing when none is given.
    fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Browse(self.browse))
    }
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Convert, process and store one file.
    Process(ProcessArgs),
    /// Browse the pages of a stored book (the default).
    Browse(BrowseArgs),
}

#[derive(Debug, PartialEq, Eq, Args)]
struct ProcessArgs {
    /// File to process (.html or .htm).
    file: PathBuf,

    /// Key to store the book under [default: users/<user>/books/<file name>].
    #[arg(long)]
    key: Option<String>,

    /// Book store directory, overriding the config file.
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq, Args)]
struct BrowseArgs {
    /// Key of the book to open [default: the newest book].
    book_key: Option<String>,

    /// Book store directory, overriding the config file.
    #[arg(long)]
    store: Option<PathBuf>,
}

fn main() -> Result<()> {
    let command = Cli::parse().into_command();

    // Keep the terminal UI clear of log output unless asked for
    let level = match command {
        Command::Browse(_) => log::LevelFilter::Warn,
        Command::Process(_) => log::LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let result = match &command {
        Command::Process(args) => resolve_config(args.store.clone())
            .and_then(|config| process_file(&config, &args.file, args.key.as_deref())),
        Command::Browse(args) => resolve_config(args.store.clone())
            .and_then(|config| browse(&config, args.book_key.as_deref())),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
    Ok(())
}

/// Config file settings, with `--store` taking precedence over the file.
fn resolve_config(store: Option<PathBuf>) -> Result<Config> {
    let loaded = Config::load()?;
    log::debug!("Config path: {}", Config::config_path().display());

    match (store, loaded) {
        (Some(path), Some(mut config)) => {
            config.store_path = path;
            Ok(config)
        }
        (Some(path), None) => Ok(Config::new(path)),
        (None, Some(config)) => Ok(config),
        (None, None) => bail!(
            "no --store given and no config file found; create one at {}",
            Config::config_path().display()
        ),
    }
}

fn process_file(config: &Config, file: &Path, key: Option<&str>) -> Result<()> {
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' has no usable file name", file.display()))?;
    let key = match key {
        Some(key) => DocumentKey::new(key)?,
        None => DocumentKey::for_upload(&owner(), file_name)?,
    };
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let document = process_upload(
        file_name,
        &bytes,
        &HtmlPassthrough,
        &config.pipeline_options(),
    )?;

    fs::create_dir_all(&config.store_path)?;
    let mut store = FsBookStore::open(&config.store_path)?;
    let id = store.save_book(&key, key.display_name(), &document)?;

    println!("Stored {key} (book {id})");
    println!("  pages:     {}", document.total_pages());
    println!("  sentences: {}", document.total_sentences());
    if !document.diagnostics.is_empty() {
        println!("  markup problems:");
        for diagnostic in &document.diagnostics {
            println!("    {diagnostic}");
        }
    }
    Ok(())
}

/// Name used in upload keys: the login user, or `local`.
fn owner() -> String {
    env::var("USER").unwrap_or_else(|_| "local".to_string())
}

fn browse(config: &Config, key: Option<&str>) -> Result<()> {
    let store = FsBookStore::open(&config.store_path).with_context(|| {
        format!("Store path '{}' is invalid", config.store_path.display())
    })?;

    let book = match key {
        Some(key) => store
            .book_by_key(&DocumentKey::new(key)?)?
            .with_context(|| format!("no book stored under {key}"))?,
        None => store
            .list_books()?
            .into_iter()
            .next()
            .context("the store has no books yet; add one with `process <file>`")?,
    };
    let pages = store.pages(book.id)?;
    let mut app = App::new(book, &pages);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_page(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_page(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)].as_ref())
        .split(rows[0]);

    // Page list panel
    let page_items: Vec<ListItem> = app
        .page_labels()
        .into_iter()
        .map(|label| ListItem::new(Line::from(label)))
        .collect();

    let pages_list = List::new(page_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.book.title.clone()),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(pages_list, chunks[0], &mut app.page_list_state);

    // Sentence panel
    let content_text: Vec<Line> = app
        .content_lines()
        .into_iter()
        .map(|line| Line::from(vec![Span::raw(line)]))
        .collect();

    let title = app
        .selected_page()
        .map(|page| format!("Page {} of {}", page.number, app.pages.len()))
        .unwrap_or_else(|| "Sentences".to_string());
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(content, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous page | "),
        Span::raw("↓/j: Next page"),
    ]));
    f.render_widget(help, rows[1]);
}
