//! HTML markup for panel nodes and the submit control.
//!
//! Message content is always escaped and rendered as plain text; the only
//! transformation applied is turning line breaks into `<br>`.

use crate::message::{Message, MessageRole};

/// Common icon size class.
const ICON_SIZE: &str = "h-4 w-4";

/// User/person icon.
pub fn user_icon() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE}"><path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/></svg>"#
    )
}

/// Assistant/sparkles icon.
pub fn assistant_icon() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE}"><path d="m12 3-1.912 5.813a2 2 0 0 1-1.275 1.275L3 12l5.813 1.912a2 2 0 0 1 1.275 1.275L12 21l1.912-5.813a2 2 0 0 1 1.275-1.275L21 12l-5.813-1.912a2 2 0 0 1-1.275-1.275L12 3Z"/></svg>"#
    )
}

/// Send/arrow icon shown on an idle submit control.
pub fn send_icon() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE}"><line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/></svg>"#
    )
}

/// Spinner icon shown while a request is in flight.
pub fn loader_icon() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE} animate-spin"><path d="M21 12a9 9 0 1 1-6.219-8.56"/></svg>"#
    )
}

/// Visual state of the submit control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitAffordance {
    /// Ready to send.
    #[default]
    Ready,
    /// Request in flight.
    Loading,
}

impl SubmitAffordance {
    /// Inner markup of the submit control for this state.
    #[must_use]
    pub fn markup(self) -> String {
        match self {
            Self::Ready => send_icon(),
            Self::Loading => loader_icon(),
        }
    }
}

/// Escape text so it renders literally inside HTML.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape content and turn line breaks into `<br>`.
pub fn render_content(content: &str) -> String {
    escape_html(content)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

fn role_icon(role: MessageRole) -> String {
    match role {
        MessageRole::User => user_icon(),
        MessageRole::Assistant => assistant_icon(),
    }
}

/// Markup for a single message node.
pub fn message_markup(message: &Message) -> String {
    let role = message.role.as_str();
    format!(
        r#"<div class="chat-message {role}"><div class="message-icon">{icon}</div><div class="{role}-msg">{content}</div><span class="message-time">{time}</span></div>"#,
        icon = role_icon(message.role),
        content = render_content(&message.content),
        time = escape_html(&message.timestamp),
    )
}

/// Markup for the typing placeholder.
pub fn typing_indicator_markup(id: &str) -> String {
    format!(
        r#"<div id="{id}" class="chat-message assistant"><div class="message-icon">{icon}</div><div class="assistant-msg typing"><span class="typing-dot"></span><span class="typing-dot"></span><span class="typing-dot"></span></div></div>"#,
        id = escape_html(id),
        icon = assistant_icon(),
    )
}
