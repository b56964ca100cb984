//! Terminal front end.
//!
//! Drives a [`ChatWidget`] over a [`HeadlessPage`]: every input line is typed
//! into the text field and followed by Enter, new panel messages are printed,
//! and native fallback submissions are performed as plain form posts.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use url::Url;

use crate::dom::{FormSubmission, HostEvent};
use crate::headless::HeadlessPage;
use crate::message::{Clock, Message, MessageRole};
use crate::theme::ThemeMode;
use crate::transport::Transport;
use crate::widget::{ChatWidget, SubmitOutcome};

const RESET: &str = "\x1b[0m";

/// Performs the non-intercepted form submission: same endpoint, same fields,
/// no async marker header.
#[derive(Debug, Clone)]
pub struct NativeNavigator {
    endpoint: Url,
    http: reqwest::Client,
}

impl NativeNavigator {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Navigate with an existing client. Pass the transport's client so the
    /// session cookies it received travel with the native submission.
    pub fn with_client(endpoint: Url, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }

    /// Post the form and return the status of the page it navigated to.
    pub async fn navigate(&self, submission: &FormSubmission) -> Result<u16, reqwest::Error> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&submission.fields)
            .send()
            .await?;
        let status = response.status().as_u16();

        tracing::info!(
            name: "chat.native.navigated",
            endpoint = %self.endpoint,
            status,
            "Native form submission completed"
        );
        Ok(status)
    }
}

/// Interactive session over a headless page.
#[derive(Debug)]
pub struct TerminalSession<T, C> {
    widget: ChatWidget<HeadlessPage, T, C>,
    navigator: Option<NativeNavigator>,
    theme: ThemeMode,
    shown: usize,
    draft: String,
}

impl<T, C> TerminalSession<T, C>
where
    T: Transport,
    C: Clock,
{
    pub fn new(
        widget: ChatWidget<HeadlessPage, T, C>,
        navigator: Option<NativeNavigator>,
        theme: ThemeMode,
    ) -> Self {
        Self {
            widget,
            navigator,
            theme,
            shown: 0,
            draft: String::new(),
        }
    }

    pub fn widget(&self) -> &ChatWidget<HeadlessPage, T, C> {
        &self.widget
    }

    /// Read lines until EOF.
    ///
    /// A line ending in `\` is Shift+Enter: the newline is kept in the draft
    /// and nothing is sent.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if !self.widget.is_active() {
            writeln!(out, "No chat form on this page.")?;
            return Ok(());
        }
        writeln!(out, "Chat ready ({} theme). Enter sends, trailing \\ continues.", self.theme)?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            self.line(&line, out).await?;
        }
        Ok(())
    }

    async fn line<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<()> {
        let (text, continued) = match line.strip_suffix('\\') {
            Some(head) => (head, true),
            None => (line, false),
        };
        self.draft.push_str(text);
        if continued {
            self.draft.push('\n');
        }

        let draft = self.draft.clone();
        self.widget.host_mut().type_text(&draft);
        self.widget.handle_event(HostEvent::Input).await;

        let outcome = self
            .widget
            .handle_event(HostEvent::KeyDown {
                key: "Enter".to_string(),
                shift: continued,
            })
            .await;
        if continued {
            return Ok(());
        }
        self.draft.clear();

        self.print_new_messages(out)?;
        if outcome.submit == Some(SubmitOutcome::FallbackSubmitted) {
            self.navigate(out).await?;
        }
        Ok(())
    }

    fn print_new_messages<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let fresh: Vec<Message> = self
            .widget
            .host()
            .messages()
            .skip(self.shown)
            .cloned()
            .collect();
        for message in &fresh {
            writeln!(out, "{}", format_message(message, self.theme))?;
        }
        self.shown += fresh.len();
        Ok(())
    }

    async fn navigate<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        for submission in self.widget.host_mut().take_submissions() {
            match &self.navigator {
                Some(navigator) => match navigator.navigate(&submission).await {
                    Ok(status) => writeln!(out, "(reloaded page: HTTP {status})")?,
                    Err(e) => {
                        tracing::error!(
                            name: "chat.native.failed",
                            error = %e,
                            "Native form submission failed"
                        );
                        writeln!(out, "(page reload failed)")?;
                    }
                },
                None => writeln!(out, "(form submitted natively)")?,
            }
        }
        Ok(())
    }
}

fn palette(role: MessageRole, theme: ThemeMode) -> &'static str {
    match (role, theme) {
        (MessageRole::User, ThemeMode::Light) => "\x1b[34m",
        (MessageRole::User, ThemeMode::Dark) => "\x1b[94m",
        (MessageRole::Assistant, ThemeMode::Light) => "\x1b[32m",
        (MessageRole::Assistant, ThemeMode::Dark) => "\x1b[92m",
    }
}

/// One panel message as terminal text. Continuation lines are indented under
/// the first.
pub fn format_message(message: &Message, theme: ThemeMode) -> String {
    let label = match message.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "assistant",
    };
    let prefix = format!("[{}] {label}: ", message.timestamp);
    let indent = " ".repeat(prefix.chars().count());
    let body = message.content.lines().collect::<Vec<_>>().join(&format!("\n{indent}"));
    format!("{}{prefix}{RESET}{body}", palette(message.role, theme))
}
