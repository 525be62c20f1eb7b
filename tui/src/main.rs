use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use shared::types::{LoginData, PublicUser, RegisterData, StatsResponse};

mod api;
mod session;
mod state;
mod ui;

use api::ApiClient;
use session::SessionStore;
use state::{App, Mode, Screen};

const DEFAULT_SERVER: &str = "http://127.0.0.1:3001";

/// Results of background API calls, delivered to the event loop.
enum AppEvent {
    IdentityResolved(Option<PublicUser>),
    AuthSucceeded(PublicUser),
    AuthFailed(String),
    StatsLoaded(StatsResponse),
}

#[tokio::main]
async fn main() -> Result<()> {
    let base_url =
        std::env::var("DASHBOARD_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
    let store = SessionStore::new()?;
    let client = ApiClient::new(base_url, store);

    let terminal = ratatui::init();
    let result = run(terminal, client).await;
    ratatui::restore();
    result
}

async fn run(mut terminal: ratatui::DefaultTerminal, client: ApiClient) -> Result<()> {
    let mut app = App::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    // Resolve the stored session before anything renders as authenticated.
    // No token means no request: the answer is immediate.
    if client.store().load().is_some() {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let user = client.me().await.ok();
            let _ = tx.send(AppEvent::IdentityResolved(user));
        });
    } else {
        let _ = tx.send(AppEvent::IdentityResolved(None));
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        while let Ok(event) = rx.try_recv() {
            apply(&mut app, event, &client, &tx);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code, key.modifiers, &client, &tx);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn apply(
    app: &mut App,
    event: AppEvent,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match event {
        AppEvent::IdentityResolved(user) => {
            let authenticated = user.is_some();
            app.resolve_identity(user);
            if authenticated {
                fetch_stats(client, tx);
            }
        }
        AppEvent::AuthSucceeded(user) => {
            app.finish_auth(user);
            fetch_stats(client, tx);
        }
        AppEvent::AuthFailed(message) => app.fail_submit(message),
        AppEvent::StatsLoaded(stats) => app.stats = Some(stats),
    }
}

fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match app.screen() {
        Screen::Loading => {
            if code == KeyCode::Esc || code == KeyCode::Char('q') {
                app.should_quit = true;
            }
        }
        Screen::Login => handle_form_key(app, code, modifiers, client, tx),
        Screen::Dashboard => {
            if code == KeyCode::Char('l') && modifiers.contains(KeyModifiers::CONTROL) {
                client.logout();
                app.logout();
            } else if code == KeyCode::Char('q') || code == KeyCode::Esc {
                app.should_quit = true;
            }
        }
    }
}

fn handle_form_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => app.toggle_mode(),
        KeyCode::Tab => app.focus_next(),
        KeyCode::Enter => submit(app, client, tx),
        KeyCode::Backspace => {
            app.focused_input().pop();
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.focused_input().push(c);
        }
        _ => {}
    }
}

fn submit(app: &mut App, client: &ApiClient, tx: &mpsc::UnboundedSender<AppEvent>) {
    if !app.begin_submit() {
        debug!("Submission already in flight, ignoring");
        return;
    }

    let mode = app.mode;
    let name = app.name.clone();
    let email = app.email.clone();
    let password = app.password.clone();
    let client = client.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let result = match mode {
            Mode::Login => client.login(&LoginData { email, password }).await,
            Mode::Register => {
                client
                    .register(&RegisterData {
                        name,
                        email,
                        password,
                    })
                    .await
            }
        };
        let event = match result {
            Ok(success) => AppEvent::AuthSucceeded(success.user),
            Err(err) => AppEvent::AuthFailed(err.message()),
        };
        let _ = tx.send(event);
    });
}

fn fetch_stats(client: &ApiClient, tx: &mpsc::UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Ok(stats) = client.stats().await {
            let _ = tx.send(AppEvent::StatsLoaded(stats));
        }
    });
}
