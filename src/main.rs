use std::io;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use harfboard::app::{App, Focus, FocusMove};
use harfboard::config::Config;
use harfboard::event::{AppEvent, EventHandler};
use harfboard::keyboard::display::ControlKey;
use harfboard::keyboard::layout::{Language, LayoutTable};
use harfboard::keyboard::state::KeyboardState;
use harfboard::keyboard::validate;
use harfboard::logging;
use harfboard::session::controller::KeyboardSession;
use harfboard::text::clipboard::Clipboard;
use harfboard::ui::components::control_bar::ControlBar;
use harfboard::ui::components::keyboard_grid::KeyboardGrid;
use harfboard::ui::components::status_bar::StatusBar;
use harfboard::ui::components::text_panel::TextPanel;
use harfboard::ui::layout::pack_hint_lines;
use harfboard::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "harfboard", version, about = "On-screen English/Urdu keyboard for the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Start in this language (english, urdu)")]
    language: Option<String>,

    #[arg(short, long, help = "Log at debug level")]
    verbose: bool,

    #[arg(long, help = "Print the active layout as JSON and exit")]
    export_layout: bool,

    #[arg(long, help = "Validate the built-in layouts and exit")]
    check_layouts: bool,

    #[arg(long, help = "Forget the saved keyboard language and exit")]
    clear_language: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    if let Err(err) = logging::init(level, &config.log_path()) {
        eprintln!("harfboard: logging disabled: {err:#}");
    }
    match config_error {
        Some(err) => tracing::warn!("could not read config, using defaults: {err:#}"),
        // First run: leave an editable copy of the defaults.
        None if !Config::config_path().exists() => {
            if let Err(err) = config.save() {
                tracing::warn!("could not write default config: {err:#}");
            }
        }
        None => {}
    }

    if cli.check_layouts {
        return check_layouts();
    }
    if cli.export_layout {
        return export_layout(&config, cli.language.as_deref());
    }
    if cli.clear_language {
        return clear_language(&config);
    }

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let theme: &'static Theme = Box::leak(Box::new(Theme::load_or_default(theme_name)));

    let mut app = App::from_config(config, theme);
    if let Some(code) = cli.language.as_deref() {
        app.session.switch_language(code);
    }
    app.sync(Instant::now());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("exited with error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn check_layouts() -> Result<()> {
    let report = validate::validate_table();
    println!(
        "table: {}",
        serde_json::to_string(&KeyboardState::new().metadata())?
    );
    for language in LayoutTable::languages() {
        for mode in LayoutTable::modes() {
            let stats = validate::stats(LayoutTable::layout(*language, *mode));
            println!("{language}/{mode}: {}", serde_json::to_string(&stats)?);
        }
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
    if !report.is_valid() {
        bail!("{} layout error(s)", report.errors.len());
    }
    println!("all layouts valid");
    Ok(())
}

fn export_layout(config: &Config, language: Option<&str>) -> Result<()> {
    let language = match language {
        Some(code) => code.parse::<Language>()?,
        None => config.language(),
    };
    let state = KeyboardState::with_language(language);
    println!("{}", state.export_layout()?);
    Ok(())
}

fn clear_language(config: &Config) -> Result<()> {
    let mut session = KeyboardSession::new(
        App::language_preference(config),
        Clipboard::with_backends(Vec::new()),
    );
    if !session.clear_language_preference() {
        bail!("could not clear the saved language, see {}", config.log_path().display());
    }
    println!("saved language cleared; next start uses {}", config.language());
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick => {
                app.tick(Instant::now());
            }
            AppEvent::Resize => {}
        }
        app.sync(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('y') => {
                app.session.copy_to_clipboard();
            }
            KeyCode::Char('l') => app.session.clear_text(),
            KeyCode::Char('r') => app.session.reset(),
            KeyCode::Char('k') => {
                app.session.clear_language_preference();
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up => app.move_focus(FocusMove::Up),
        KeyCode::Down => app.move_focus(FocusMove::Down),
        KeyCode::Left => app.move_focus(FocusMove::Left),
        KeyCode::Right => app.move_focus(FocusMove::Right),
        KeyCode::Enter => app.activate_focused(),
        KeyCode::Backspace => {
            app.session.delete_backward();
        }
        KeyCode::F(2) => app.next_language(),
        KeyCode::F(3) => app.session.activate(ControlKey::SymbolsToggle),
        KeyCode::F(4) => app.session.activate(ControlKey::Caps),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
        app.click(mouse.column, mouse.row);
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    app.viewport = frame.area();
    let layout = app.layout();
    let colors = &app.theme.colors;

    let hints = pack_hint_lines(
        &[
            "harfboard",
            "[←↑↓→] Move",
            "[Enter] Press",
            "[F2] Language",
            "[F3] Symbols",
            "[F4] Caps",
            "[^Y] Copy",
            "[^L] Clear",
            "[^K] Forget language",
            "[Esc] Quit",
        ],
        layout.header.width as usize,
    );
    let header = Paragraph::new(hints.into_iter().next().unwrap_or_default())
        .style(Style::default().fg(colors.header_fg()).bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let state = app.session.state();
    let (key_focus, control_focus) = match app.focus {
        Focus::Key { row, col } => (Some((row, col)), None),
        Focus::Control(idx) => (None, Some(idx)),
    };

    frame.render_widget(TextPanel::new(app.session.buffer(), app.theme), layout.text);
    frame.render_widget(KeyboardGrid::new(state, key_focus, app.theme), layout.keyboard);
    frame.render_widget(ControlBar::new(state, control_focus, app.theme), layout.controls);
    frame.render_widget(
        StatusBar::new(state, app.status.current(), app.theme),
        layout.footer,
    );
}
