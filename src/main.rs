//! Chat Widget terminal front end
//!
//! Entry point running the chat widget against a live endpoint.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::Context;
use chat_widget::config::AppConfig;
use chat_widget::headless::HeadlessPage;
use chat_widget::message::SystemClock;
use chat_widget::terminal::{NativeNavigator, TerminalSession};
use chat_widget::theme::{self, FilePreferences, MemoryPreferences, PreferenceStore};
use chat_widget::{ChatWidget, HttpTransport};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

// Single UI thread, like the page the widget is modelled on.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED). Stderr keeps the panel clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load().context("Configuration error")?;
    let settings = config.widget_settings();

    info!(
        name: "chat.config.loaded",
        endpoint = %config.transport.endpoint,
        input_kind = %config.terminal.input_kind,
        "Chat widget configuration loaded"
    );

    let mut page = HeadlessPage::with_selectors(&settings.selectors, config.input_control()?);

    let store: Box<dyn PreferenceStore> = match &config.theme.preferences_file {
        Some(path) => Box::new(FilePreferences::load(path).unwrap_or_else(|e| {
            tracing::warn!(name: "theme.preferences.unreadable", error = %e, "Ignoring stored preferences");
            FilePreferences::default()
        })),
        None => Box::new(MemoryPreferences::new()),
    };
    let mode = theme::init_theme(store.as_ref(), config.theme.platform_prefers_dark, &mut page);

    let endpoint = Url::parse(&config.transport.endpoint)
        .with_context(|| format!("Invalid endpoint: {}", config.transport.endpoint))?;
    // One cookie jar for both paths, as a browser page would have.
    let http = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .context("Failed to build HTTP client")?;
    let transport = HttpTransport::with_client(endpoint.clone(), http.clone())
        .requested_with(config.transport.requested_with.clone());
    let navigator = NativeNavigator::with_client(endpoint, http);

    let widget = ChatWidget::initialize(page, transport, SystemClock, settings);
    let mut session = TerminalSession::new(widget, Some(navigator), mode);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await?;

    info!(name: "chat.session.closed", "Input closed");
    Ok(())
}
