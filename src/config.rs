use crate::dom::{InputControl, Selectors};
use crate::widget::{DEFAULT_MAX_INPUT_HEIGHT, WidgetSettings};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Config file picked up from the working directory when none is named.
const DEFAULT_CONFIG_FILE: &str = "chat-widget.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// URL the chat form posts to
    #[arg(long, env = "CHAT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Report a dark platform color scheme
    #[arg(long, env = "PREFERS_DARK")]
    pub prefers_dark: Option<bool>,

    /// JSON file holding stored preferences
    #[arg(long, env = "PREFERENCES_FILE")]
    pub preferences: Option<String>,

    /// Text field kind: `textarea` (auto-growing) or `input`
    #[arg(long, env = "INPUT_KIND")]
    pub input_kind: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub transport: TransportConfig,
    pub dom: DomConfig,
    pub theme: ThemeConfig,
    pub terminal: TerminalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    pub endpoint: String,
    pub requested_with: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DomConfig {
    pub panel_id: String,
    pub form_id: String,
    pub field_name: String,
    pub max_input_height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    pub preferences_file: Option<String>,
    pub platform_prefers_dark: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TerminalConfig {
    pub input_kind: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("transport.endpoint", "http://127.0.0.1:5000/")?
            .set_default("transport.requested_with", "XMLHttpRequest")?
            .set_default("dom.panel_id", "chat-box")?
            .set_default("dom.form_id", "chat-form")?
            .set_default("dom.field_name", "query")?
            .set_default("dom.max_input_height", i64::from(DEFAULT_MAX_INPUT_HEIGHT))?
            .set_default("theme.platform_prefers_dark", false)?
            .set_default("terminal.input_kind", "textarea")?;

        // 2. Config file: explicit path must exist, the cwd default may not
        match &cli.config {
            Some(path) => builder = builder.add_source(File::with_name(path).required(true)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
            None => {}
        }

        // 3. Environment variables, e.g. CHAT_WIDGET_TRANSPORT__ENDPOINT
        builder = builder.add_source(
            Environment::with_prefix("CHAT_WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their clap env vars) win over everything
        if let Some(endpoint) = cli.endpoint {
            builder = builder.set_override("transport.endpoint", endpoint)?;
        }
        if let Some(dark) = cli.prefers_dark {
            builder = builder.set_override("theme.platform_prefers_dark", dark)?;
        }
        if let Some(prefs) = cli.preferences {
            builder = builder.set_override("theme.preferences_file", prefs)?;
        }
        if let Some(kind) = cli.input_kind {
            builder = builder.set_override("terminal.input_kind", kind)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Widget settings derived from the `dom` section.
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            selectors: Selectors {
                panel_id: self.dom.panel_id.clone(),
                form_id: self.dom.form_id.clone(),
                field_name: self.dom.field_name.clone(),
            },
            max_input_height: self.dom.max_input_height,
        }
    }

    /// Kind of text field the terminal page carries.
    pub fn input_control(&self) -> Result<InputControl, config::ConfigError> {
        match self.terminal.input_kind.to_lowercase().as_str() {
            "textarea" | "auto" | "auto-growing" => Ok(InputControl::AutoGrowing),
            "input" | "simple" => Ok(InputControl::Simple),
            other => Err(config::ConfigError::Message(format!(
                "unknown terminal.input_kind: {other}"
            ))),
        }
    }
}
