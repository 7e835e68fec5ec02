use std::cell::RefCell;
use std::rc::Rc;
use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use plume::component::EditorComponent;
use plume::config::DemoConfig;
use plume::events::EditorHandlers;
use plume::props::EditorProps;
use plume::ui;
use plumecore::{ChangeSource, Range, RopeWidgetFactory};

const THEMES: &[&str] = &["classic", "bubble", "ink"];

const SAMPLE_TEXT: &str = "The pen is mightier than the keyboard.\n\
Replace this text, toggle read-only, or cycle the theme to watch\n\
the widget regenerate without losing what you wrote.";

const EVENT_FEED_LIMIT: usize = 100;

struct DemoApp {
    component: EditorComponent,
    config: DemoConfig,
    events: Rc<RefCell<Vec<String>>>,
    should_quit: bool,
}

impl DemoApp {
    fn new(config: DemoConfig) -> Result<Self> {
        let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let handlers = build_handlers(events.clone());

        let mut component = EditorComponent::new(
            config.to_props(),
            handlers,
            Box::new(RopeWidgetFactory),
        );
        component.mount()?;
        component.focus();

        Ok(Self {
            component,
            config,
            events,
            should_quit: false,
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => {
                    log::info!("Exit requested via Ctrl+Q");
                    self.should_quit = true;
                }
                KeyCode::Char('r') => self.toggle_read_only(),
                KeyCode::Char('t') => self.cycle_theme(),
                KeyCode::Char('l') => self.load_sample(),
                _ => {}
            }
            self.component.handle_key(key);
            return;
        }

        self.component.handle_key(key);
        self.apply_edit(key);
    }

    /// In-place prop update: never regenerates the widget.
    fn toggle_read_only(&mut self) {
        let next = EditorProps {
            read_only: !self.component.props().read_only,
            ..self.component.props().clone()
        };
        if let Err(e) = self.component.update(next) {
            log::error!("Read-only update failed: {}", e);
        }
    }

    /// Dirty prop update: forces a regeneration with carried content.
    fn cycle_theme(&mut self) {
        let current = self.component.props().theme.clone();
        let position = THEMES.iter().position(|t| *t == current).unwrap_or(0);
        let next_theme = THEMES[(position + 1) % THEMES.len()];

        let next = EditorProps {
            theme: next_theme.to_string(),
            ..self.component.props().clone()
        };
        match self.component.update(next) {
            Ok(outcome) => log::info!("Theme -> {} ({:?})", next_theme, outcome),
            Err(e) => log::error!("Theme update failed: {}", e),
        }
    }

    /// Controlled push of a sample document, then back to uncontrolled
    /// so typing keeps ownership of the content.
    fn load_sample(&mut self) {
        let controlled = EditorProps {
            value: Some(SAMPLE_TEXT.to_string()),
            ..self.component.props().clone()
        };
        if let Err(e) = self.component.update(controlled) {
            log::error!("Sample load failed: {}", e);
            return;
        }

        let released = EditorProps {
            value: None,
            ..self.component.props().clone()
        };
        if let Err(e) = self.component.update(released) {
            log::error!("Sample release failed: {}", e);
        }
    }

    /// Route an editing key into the widget as user input. The binding
    /// itself never does this; it is the demo standing in for the host's
    /// input layer.
    fn apply_edit(&mut self, key: &KeyEvent) {
        let Some(widget) = self.component.widget_mut() else {
            return;
        };

        let caret = match widget.selection() {
            Some(range) => range.index,
            None => {
                let end = widget.length();
                widget.set_selection(Some(Range::collapsed(end)), ChangeSource::Silent);
                end
            }
        };

        match key.code {
            KeyCode::Char(c) => {
                widget.insert(caret, &c.to_string(), ChangeSource::User);
            }
            KeyCode::Enter => {
                widget.insert(caret, "\n", ChangeSource::User);
            }
            KeyCode::Backspace => {
                if caret > 0 {
                    widget.delete(Range::new(caret - 1, 1), ChangeSource::User);
                }
            }
            KeyCode::Delete => {
                widget.delete(Range::new(caret, 1), ChangeSource::User);
            }
            KeyCode::Left => {
                widget.set_selection(
                    Some(Range::collapsed(caret.saturating_sub(1))),
                    ChangeSource::User,
                );
            }
            KeyCode::Right => {
                widget.set_selection(Some(Range::collapsed(caret + 1)), ChangeSource::User);
            }
            _ => {}
        }
    }

    fn trim_event_feed(&self) {
        let mut feed = self.events.borrow_mut();
        let overflow = feed.len().saturating_sub(EVENT_FEED_LIMIT);
        if overflow > 0 {
            feed.drain(..overflow);
        }
    }
}

fn build_handlers(events: Rc<RefCell<Vec<String>>>) -> EditorHandlers {
    let mut handlers = EditorHandlers::new();

    let feed = events.clone();
    handlers.on_change = Some(Box::new(move |value, delta, source, _snapshot| {
        feed.borrow_mut().push(format!(
            "text-change({:?}: retain {} delete {} insert {:?}) -> {:?}",
            source,
            delta.retain,
            delta.delete,
            delta.insert,
            preview(value),
        ));
    }));

    let feed = events.clone();
    handlers.on_change_selection = Some(Box::new(move |range, source, _snapshot| {
        feed.borrow_mut()
            .push(format!("selection-change({:?}: {})", source, format_range(range)));
    }));

    let feed = events;
    handlers.on_key_down = Some(Box::new(move |key| {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            feed.borrow_mut().push(format!("key-down({:?})", key.code));
        }
    }));

    handlers
}

fn format_range(range: Option<Range>) -> String {
    match range {
        Some(range) => format!("{},{}", range.index, range.end()),
        None => String::from("none"),
    }
}

fn preview(value: &str) -> String {
    const LIMIT: usize = 24;
    if value.chars().count() <= LIMIT {
        value.to_string()
    } else {
        let head: String = value.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with debug fallback for development
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("plume", LevelFilter::Debug);
    }
    logger.init();

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    if let Err(e) = enable_raw_mode() {
        eprintln!("Failed to initialize the terminal: {}", e);
        return Err(e.into());
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        eprintln!("Failed to configure the terminal: {}", e);
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let config = DemoConfig::load().await.unwrap_or_else(|e| {
        log::error!("Config load failed, using defaults: {}", e);
        DemoConfig::default()
    });

    let app = match DemoApp::new(config) {
        Ok(app) => {
            log::info!("Demo initialized successfully");
            app
        }
        Err(e) => {
            restore_terminal()?;
            eprintln!("Failed to initialize the demo: {}", e);
            return Err(e);
        }
    };

    let res = run_app(&mut terminal, app).await;

    restore_terminal()?;

    if let Err(err) = res {
        eprintln!("The demo exited with an error: {}", err);
        log::error!("Demo error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: DemoApp) -> Result<()> {
    loop {
        // Dispatch widget-originated events before drawing
        app.component.pump_events();
        app.trim_event_feed();

        if let Err(e) = terminal.draw(|f| {
            let feed = app.events.borrow();
            ui::draw(f, &app.component, &feed, app.config.show_events);
        }) {
            log::error!("Terminal draw error: {}", e);
            // Continue running despite draw errors
        }

        if app.should_quit {
            log::info!("Demo shutdown requested");
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(&key),
                Event::Resize(_, _) => {
                    log::info!("Terminal resized");
                }
                Event::Mouse(_) => {
                    // Ignore mouse events for now
                }
                _ => {}
            }
        }
    }

    app.component.unmount();
    log::info!("Demo loop ended successfully");
    Ok(())
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
