//! The page contract consumed by the chat widget.
//!
//! [`ChatHost`] is the only way the widget touches the page. A browser
//! binding, the in-memory [`HeadlessPage`](crate::headless::HeadlessPage)
//! and test doubles all implement it.

use crate::message::Message;
use crate::render::SubmitAffordance;

/// Element names the widget looks up on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// Id of the message panel.
    pub panel_id: String,
    /// Id of the chat form.
    pub form_id: String,
    /// Name of the text field inside the form.
    pub field_name: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            panel_id: "chat-box".to_string(),
            form_id: "chat-form".to_string(),
            field_name: "query".to_string(),
        }
    }
}

/// Capability of the text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputControl {
    /// Single-line input with a fixed height.
    Simple,
    /// Multi-line field that grows with its content.
    AutoGrowing,
}

/// Controls found by [`ChatHost::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Kind of the `query` field.
    pub input: InputControl,
    /// Whether the form has a submit control.
    pub has_submit: bool,
}

/// Height applied to an auto-growing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputHeight {
    /// Let the field size itself.
    Auto,
    /// Fixed height in CSS pixels.
    Px(u32),
}

/// Event kinds the widget listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    KeyDown,
    Input,
}

/// Handle returned by [`ChatHost::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An event delivered by the host to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The form was submitted.
    Submit,
    /// A key was pressed in the text field.
    KeyDown { key: String, shift: bool },
    /// The text field content changed.
    Input,
}

impl HostEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Submit => EventKind::Submit,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Input => EventKind::Input,
        }
    }

    /// Enter pressed without Shift.
    #[must_use]
    pub fn enter() -> Self {
        Self::KeyDown {
            key: "Enter".to_string(),
            shift: false,
        }
    }
}

/// A node appended to the message panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelNode {
    /// A rendered chat message.
    Message { message: Message, markup: String },
    /// The transient typing placeholder.
    Typing { id: String, markup: String },
}

impl PanelNode {
    /// Element id, if the node carries one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Message { .. } => None,
            Self::Typing { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        match self {
            Self::Message { markup, .. } | Self::Typing { markup, .. } => markup,
        }
    }
}

/// A native, non-intercepted form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Form fields in document order.
    pub fields: Vec<(String, String)>,
}

/// Page surface the widget drives.
pub trait ChatHost {
    /// Look up the panel, form and text field. `None` if any is missing.
    fn locate(&self, selectors: &Selectors) -> Option<Controls>;

    /// Register interest in an event kind.
    fn listen(&mut self, kind: EventKind) -> ListenerId;

    /// Drop a registration made by [`ChatHost::listen`].
    fn unlisten(&mut self, id: ListenerId);

    fn input_value(&self) -> String;

    fn set_input_value(&mut self, value: &str);

    /// Content height of the text field in CSS pixels.
    fn input_scroll_height(&self) -> u32;

    fn set_input_height(&mut self, height: InputHeight);

    /// Enable or disable the text field and the submit control together.
    fn set_controls_disabled(&mut self, disabled: bool);

    fn set_submit_affordance(&mut self, affordance: SubmitAffordance);

    fn focus_input(&mut self);

    fn append_to_panel(&mut self, node: PanelNode);

    /// Remove the panel node with the given id. Returns whether one existed.
    fn remove_from_panel(&mut self, id: &str) -> bool;

    fn scroll_panel_to_bottom(&mut self);

    /// Submit the chat form through the normal page navigation path.
    ///
    /// `submission` carries only the widget's text field, because the widget
    /// clears that field before the request. The host adds the form's other
    /// fields (hidden inputs, tokens) as the page would serialize them; on a
    /// name clash the widget's value wins.
    fn submit_natively(&mut self, submission: FormSubmission);
}

/// Document root that carries the theme marker class.
pub trait DocumentRoot {
    fn has_class(&self, class: &str) -> bool;

    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);
}
