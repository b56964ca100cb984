//! Chat widget: submit lifecycle and panel rendering.
//!
//! Each submission walks `Idle → Sending → {Rendered | FallbackSubmitted} →
//! Idle`. While a submission is in flight the text field and submit control
//! are disabled, which is the only guard against a second submit. There is
//! no retry and no queue: a failed exchange degrades to a native form
//! submission so the message still reaches the server.

use thiserror::Error;

use crate::dom::{
    ChatHost, Controls, EventKind, FormSubmission, HostEvent, InputControl, InputHeight,
    ListenerId, PanelNode, Selectors,
};
use crate::message::{Clock, Message, MessageRole};
use crate::render::{self, SubmitAffordance};
use crate::transport::{ChatReply, Transport, TransportError};

/// Default cap on the height of an auto-growing field, in CSS pixels.
pub const DEFAULT_MAX_INPUT_HEIGHT: u32 = 200;

/// Widget settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Element names looked up on the page.
    pub selectors: Selectors,
    /// Maximum height an auto-growing field may reach.
    pub max_input_height: u32,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            max_input_height: DEFAULT_MAX_INPUT_HEIGHT,
        }
    }
}

/// How a submit attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The page has no chat feature.
    Inert,
    /// Blank input, nothing happened.
    Skipped,
    /// An exchange was already in flight.
    Busy,
    /// The reply was rendered in the panel.
    Rendered,
    /// The form was handed to the native submission path.
    FallbackSubmitted,
}

/// What dispatching a host event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The host must suppress the event's default action.
    pub prevent_default: bool,
    /// Result of the submit the event triggered, if any.
    pub submit: Option<SubmitOutcome>,
}

/// Why the widget fell back to a native submission.
#[derive(Error, Debug)]
pub enum FallbackReason {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("No response from server")]
    UnusableReply,
}

/// Handle to the typing placeholder currently in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingIndicator(String);

impl TypingIndicator {
    /// Element id of the placeholder node.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// A submission that has been rendered optimistically and awaits its reply.
#[derive(Debug)]
pub struct PendingExchange {
    message: String,
    indicator: TypingIndicator,
}

impl PendingExchange {
    /// Trimmed text being sent.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn indicator(&self) -> &TypingIndicator {
        &self.indicator
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitPhase {
    Idle,
    Sending,
}

#[derive(Debug)]
struct Bindings {
    controls: Controls,
    listeners: Vec<(EventKind, ListenerId)>,
}

impl Bindings {
    fn listens_to(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }
}

/// The chat widget bound to a page.
#[derive(Debug)]
pub struct ChatWidget<H, T, C> {
    host: H,
    transport: T,
    clock: C,
    settings: WidgetSettings,
    bindings: Option<Bindings>,
    phase: SubmitPhase,
}

impl<H, T, C> ChatWidget<H, T, C>
where
    H: ChatHost,
    T: Transport,
    C: Clock,
{
    /// Bind the widget to the page.
    ///
    /// If the panel, the form or the text field is missing the widget stays
    /// inert: no listener is registered and every handler is a no-op.
    pub fn initialize(mut host: H, transport: T, clock: C, settings: WidgetSettings) -> Self {
        let bindings = host.locate(&settings.selectors).map(|controls| {
            host.scroll_panel_to_bottom();

            let mut kinds = vec![EventKind::Submit, EventKind::KeyDown];
            if controls.input == InputControl::AutoGrowing {
                kinds.push(EventKind::Input);
            }
            let listeners = kinds
                .into_iter()
                .map(|kind| (kind, host.listen(kind)))
                .collect();

            Bindings {
                controls,
                listeners,
            }
        });

        if bindings.is_none() {
            tracing::debug!(
                name: "chat.widget.inert",
                panel = %settings.selectors.panel_id,
                form = %settings.selectors.form_id,
                "Chat elements not found, widget inert"
            );
        }

        Self {
            host,
            transport,
            clock,
            settings,
            bindings,
            phase: SubmitPhase::Idle,
        }
    }

    /// Unregister every listener and hand the page back.
    pub fn dispose(mut self) -> H {
        if let Some(bindings) = self.bindings.take() {
            for (_, id) in bindings.listeners {
                self.host.unlisten(id);
            }
        }
        self.host
    }

    pub fn is_active(&self) -> bool {
        self.bindings.is_some()
    }

    /// Whether an exchange is in flight.
    pub fn is_sending(&self) -> bool {
        self.phase == SubmitPhase::Sending
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    fn controls(&self) -> Option<Controls> {
        self.bindings.as_ref().map(|b| b.controls)
    }

    /// Dispatch an event delivered by the host.
    pub async fn handle_event(&mut self, event: HostEvent) -> EventOutcome {
        let listening = self
            .bindings
            .as_ref()
            .is_some_and(|b| b.listens_to(event.kind()));
        if !listening {
            return EventOutcome::default();
        }

        match event {
            HostEvent::Submit => EventOutcome {
                prevent_default: true,
                submit: Some(self.on_submit().await),
            },
            HostEvent::KeyDown { key, shift } if key == "Enter" && !shift => EventOutcome {
                prevent_default: true,
                submit: Some(self.on_submit().await),
            },
            HostEvent::KeyDown { .. } => EventOutcome::default(),
            HostEvent::Input => {
                self.on_input();
                EventOutcome::default()
            }
        }
    }

    /// Grow the field to fit its content, up to the configured cap.
    fn on_input(&mut self) {
        if self.controls().map(|c| c.input) != Some(InputControl::AutoGrowing) {
            return;
        }
        self.host.set_input_height(InputHeight::Auto);
        let height = self
            .host
            .input_scroll_height()
            .min(self.settings.max_input_height);
        self.host.set_input_height(InputHeight::Px(height));
    }

    /// Run one full submission.
    pub async fn on_submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = self.transport.send(pending.message()).await;
        self.settle(pending, result)
    }

    /// First half of a submission: validate, lock the controls and render
    /// optimistically.
    ///
    /// `Err` carries the outcome when no exchange was started.
    pub fn begin_submit(&mut self) -> Result<PendingExchange, SubmitOutcome> {
        let Some(controls) = self.controls() else {
            return Err(SubmitOutcome::Inert);
        };
        if self.phase == SubmitPhase::Sending {
            tracing::debug!(name: "chat.submit.busy", "Submit ignored, exchange in flight");
            return Err(SubmitOutcome::Busy);
        }

        let message = self.host.input_value().trim().to_string();
        if message.is_empty() {
            return Err(SubmitOutcome::Skipped);
        }

        self.phase = SubmitPhase::Sending;
        self.host.set_controls_disabled(true);
        self.host.set_submit_affordance(SubmitAffordance::Loading);

        self.push_message(MessageRole::User, &message, None);
        self.host.set_input_value("");
        if controls.input == InputControl::AutoGrowing {
            self.host.set_input_height(InputHeight::Auto);
        }

        let indicator = self.push_typing_indicator();

        tracing::info!(
            name: "chat.submit.started",
            message_length = message.len(),
            indicator = %indicator.id(),
            "Chat message submitted"
        );

        Ok(PendingExchange { message, indicator })
    }

    /// Second half of a submission: render the reply or fall back, then
    /// restore the controls.
    pub fn settle(
        &mut self,
        pending: PendingExchange,
        result: Result<ChatReply, TransportError>,
    ) -> SubmitOutcome {
        self.remove_typing_indicator(&pending.indicator);

        let outcome = match result.map_err(FallbackReason::from).and_then(usable_reply) {
            Ok((answer, timestamp)) => {
                self.push_message(MessageRole::Assistant, &answer, timestamp);
                tracing::debug!(
                    name: "chat.submit.rendered",
                    answer_length = answer.len(),
                    "Assistant reply rendered"
                );
                SubmitOutcome::Rendered
            }
            Err(reason) => {
                tracing::error!(
                    name: "chat.submit.fallback",
                    error = %reason,
                    "Async exchange failed, submitting form natively"
                );
                self.host.submit_natively(FormSubmission {
                    fields: vec![(self.settings.selectors.field_name.clone(), pending.message)],
                });
                SubmitOutcome::FallbackSubmitted
            }
        };

        self.host.set_controls_disabled(false);
        self.host.set_submit_affordance(SubmitAffordance::Ready);
        self.host.focus_input();
        self.phase = SubmitPhase::Idle;

        outcome
    }

    /// Render a message into the panel. No-op on an inert widget.
    ///
    /// Without a `timestamp` the current time is used.
    pub fn append_message(&mut self, role: MessageRole, content: &str, timestamp: Option<String>) {
        if self.is_active() {
            self.push_message(role, content, timestamp);
        }
    }

    fn push_message(&mut self, role: MessageRole, content: &str, timestamp: Option<String>) {
        let timestamp = timestamp.unwrap_or_else(|| self.clock.timestamp());
        let message = Message::new(role, content, timestamp);
        let markup = render::message_markup(&message);
        self.host
            .append_to_panel(PanelNode::Message { message, markup });
        self.host.scroll_panel_to_bottom();
    }

    /// Show the typing placeholder. `None` on an inert widget.
    pub fn show_typing_indicator(&mut self) -> Option<TypingIndicator> {
        self.is_active().then(|| self.push_typing_indicator())
    }

    fn push_typing_indicator(&mut self) -> TypingIndicator {
        let id = format!("typing-{}", self.clock.unix_millis());
        let markup = render::typing_indicator_markup(&id);
        self.host.append_to_panel(PanelNode::Typing {
            id: id.clone(),
            markup,
        });
        self.host.scroll_panel_to_bottom();
        TypingIndicator(id)
    }

    /// Remove the typing placeholder, wherever it sits in the panel.
    pub fn remove_typing_indicator(&mut self, indicator: &TypingIndicator) {
        if self.host.remove_from_panel(indicator.id()) {
            self.host.scroll_panel_to_bottom();
        }
    }
}

/// Split a reply into its answer and timestamp, rejecting blank answers.
fn usable_reply(reply: ChatReply) -> Result<(String, Option<String>), FallbackReason> {
    let answer = reply
        .usable_answer()
        .map(str::to_string)
        .ok_or(FallbackReason::UnusableReply)?;
    Ok((answer, reply.timestamp))
}
