//! In-memory page used by the terminal front end and the tests.

use std::collections::{BTreeSet, HashMap};

use crate::dom::{
    ChatHost, Controls, DocumentRoot, EventKind, FormSubmission, InputControl, InputHeight,
    ListenerId, PanelNode, Selectors,
};
use crate::message::Message;
use crate::render::SubmitAffordance;

/// Line height of the text field and of panel text, in CSS pixels.
const LINE_HEIGHT: u32 = 24;
/// Vertical padding of the text field.
const INPUT_PADDING: u32 = 20;
/// Vertical chrome around each panel node (icon row, timestamp, margins).
const NODE_CHROME: u32 = 32;

/// A headless rendition of a chat page.
///
/// Elements are modelled just far enough to observe what the widget does:
/// panel nodes, the text field state, the submit control and the document
/// root classes.
#[derive(Debug)]
pub struct HeadlessPage {
    panel_id: Option<String>,
    form_id: Option<String>,
    field_name: Option<String>,
    input_kind: InputControl,
    has_submit: bool,
    form_fields: Vec<(String, String)>,

    input_value: String,
    input_height: InputHeight,
    disabled: bool,
    focused: bool,
    affordance: SubmitAffordance,

    nodes: Vec<PanelNode>,
    scroll_top: u32,

    listeners: HashMap<ListenerId, EventKind>,
    next_listener: u64,
    submissions: Vec<FormSubmission>,
    root_classes: BTreeSet<String>,
}

impl HeadlessPage {
    /// A page carrying the full chat markup with default element names.
    #[must_use]
    pub fn new(input_kind: InputControl) -> Self {
        Self::with_selectors(&Selectors::default(), input_kind)
    }

    /// A page carrying the full chat markup under the given names.
    #[must_use]
    pub fn with_selectors(selectors: &Selectors, input_kind: InputControl) -> Self {
        Self {
            panel_id: Some(selectors.panel_id.clone()),
            form_id: Some(selectors.form_id.clone()),
            field_name: Some(selectors.field_name.clone()),
            input_kind,
            has_submit: true,
            form_fields: Vec::new(),
            input_value: String::new(),
            input_height: InputHeight::Auto,
            disabled: false,
            focused: false,
            affordance: SubmitAffordance::Ready,
            nodes: Vec::new(),
            scroll_top: 0,
            listeners: HashMap::new(),
            next_listener: 0,
            submissions: Vec::new(),
            root_classes: BTreeSet::new(),
        }
    }

    /// A page without any chat feature.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(InputControl::Simple)
            .without_panel()
            .without_form()
            .without_field()
    }

    #[must_use]
    pub fn without_panel(mut self) -> Self {
        self.panel_id = None;
        self
    }

    #[must_use]
    pub fn without_form(mut self) -> Self {
        self.form_id = None;
        self
    }

    #[must_use]
    pub fn without_field(mut self) -> Self {
        self.field_name = None;
        self
    }

    #[must_use]
    pub fn without_submit(mut self) -> Self {
        self.has_submit = false;
        self
    }

    /// Add another field to the chat form, such as a hidden token.
    #[must_use]
    pub fn with_form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((name.into(), value.into()));
        self
    }

    /// Type into the text field, replacing its content. Ignored while disabled.
    pub fn type_text(&mut self, text: &str) {
        if !self.disabled {
            self.input_value = text.to_string();
        }
    }

    pub fn nodes(&self) -> &[PanelNode] {
        &self.nodes
    }

    /// Messages currently in the panel, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.nodes.iter().filter_map(|node| match node {
            PanelNode::Message { message, .. } => Some(message),
            PanelNode::Typing { .. } => None,
        })
    }

    pub fn typing_indicators(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, PanelNode::Typing { .. }))
            .count()
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    /// Hand over pending native submissions to whoever performs navigation.
    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.submissions)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn input_height(&self) -> InputHeight {
        self.input_height
    }

    pub fn submit_affordance(&self) -> SubmitAffordance {
        self.affordance
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Total content height of the panel.
    pub fn panel_scroll_height(&self) -> u32 {
        self.nodes.iter().map(node_height).sum()
    }

    pub fn panel_scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_top == self.panel_scroll_height()
    }
}

fn node_height(node: &PanelNode) -> u32 {
    let lines = match node {
        PanelNode::Message { message, .. } => message.content.lines().count().max(1),
        PanelNode::Typing { .. } => 1,
    };
    u32::try_from(lines).unwrap_or(u32::MAX).saturating_mul(LINE_HEIGHT) + NODE_CHROME
}

impl ChatHost for HeadlessPage {
    fn locate(&self, selectors: &Selectors) -> Option<Controls> {
        let found = self.panel_id.as_deref() == Some(selectors.panel_id.as_str())
            && self.form_id.as_deref() == Some(selectors.form_id.as_str())
            && self.field_name.as_deref() == Some(selectors.field_name.as_str());
        found.then_some(Controls {
            input: self.input_kind,
            has_submit: self.has_submit,
        })
    }

    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn input_value(&self) -> String {
        self.input_value.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input_value = value.to_string();
    }

    fn input_scroll_height(&self) -> u32 {
        let lines = match self.input_kind {
            InputControl::Simple => 1,
            // A trailing newline still opens a fresh row.
            InputControl::AutoGrowing => self.input_value.split('\n').count(),
        };
        u32::try_from(lines).unwrap_or(u32::MAX).saturating_mul(LINE_HEIGHT) + INPUT_PADDING
    }

    fn set_input_height(&mut self, height: InputHeight) {
        self.input_height = height;
    }

    fn set_controls_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.focused = false;
        }
    }

    fn set_submit_affordance(&mut self, affordance: SubmitAffordance) {
        if self.has_submit {
            self.affordance = affordance;
        }
    }

    fn focus_input(&mut self) {
        if !self.disabled {
            self.focused = true;
        }
    }

    fn append_to_panel(&mut self, node: PanelNode) {
        self.nodes.push(node);
    }

    fn remove_from_panel(&mut self, id: &str) -> bool {
        // Like getElementById: only the first node carrying the id.
        let Some(index) = self.nodes.iter().position(|node| node.id() == Some(id)) else {
            return false;
        };
        self.nodes.remove(index);
        self.scroll_top = self.scroll_top.min(self.panel_scroll_height());
        true
    }

    fn scroll_panel_to_bottom(&mut self) {
        self.scroll_top = self.panel_scroll_height();
    }

    fn submit_natively(&mut self, submission: FormSubmission) {
        let mut fields: Vec<(String, String)> = self
            .form_fields
            .iter()
            .filter(|(name, _)| !submission.fields.iter().any(|(own, _)| own == name))
            .cloned()
            .collect();
        fields.extend(submission.fields);
        self.submissions.push(FormSubmission { fields });
    }
}

impl DocumentRoot for HeadlessPage {
    fn has_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    fn add_class(&mut self, class: &str) {
        self.root_classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.root_classes.remove(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;

    #[test]
    fn test_locate_requires_all_elements() {
        let selectors = Selectors::default();
        assert!(HeadlessPage::new(InputControl::Simple).locate(&selectors).is_some());
        assert!(HeadlessPage::blank().locate(&selectors).is_none());
        assert!(
            HeadlessPage::new(InputControl::Simple)
                .without_field()
                .locate(&selectors)
                .is_none()
        );

        let controls = HeadlessPage::new(InputControl::AutoGrowing)
            .without_submit()
            .locate(&selectors)
            .unwrap();
        assert_eq!(controls.input, InputControl::AutoGrowing);
        assert!(!controls.has_submit);
    }

    #[test]
    fn test_input_scroll_height_grows_with_lines() {
        let mut page = HeadlessPage::new(InputControl::AutoGrowing);
        page.type_text("one");
        let single = page.input_scroll_height();
        page.type_text("one\ntwo\nthree");
        assert_eq!(page.input_scroll_height(), single + 2 * LINE_HEIGHT);
    }

    #[test]
    fn test_remove_typing_node_by_id() {
        let mut page = HeadlessPage::new(InputControl::Simple);
        page.append_to_panel(PanelNode::Typing {
            id: "typing-1".to_string(),
            markup: String::new(),
        });
        page.append_to_panel(PanelNode::Message {
            message: Message::new(MessageRole::User, "hi", "10:00"),
            markup: String::new(),
        });
        page.scroll_panel_to_bottom();

        assert!(page.remove_from_panel("typing-1"));
        assert!(!page.remove_from_panel("typing-1"));
        assert_eq!(page.nodes().len(), 1);
        assert!(page.is_scrolled_to_bottom());
    }

    #[test]
    fn test_remove_takes_first_of_duplicate_ids() {
        let mut page = HeadlessPage::new(InputControl::Simple);
        for _ in 0..2 {
            page.append_to_panel(PanelNode::Typing {
                id: "typing-7".to_string(),
                markup: String::new(),
            });
        }

        assert!(page.remove_from_panel("typing-7"));
        assert_eq!(page.typing_indicators(), 1);
    }

    #[test]
    fn test_native_submission_includes_other_form_fields() {
        let mut page = HeadlessPage::new(InputControl::Simple)
            .with_form_field("csrf_token", "t0k")
            .with_form_field("query", "stale");

        page.submit_natively(FormSubmission {
            fields: vec![("query".to_string(), "Hello".to_string())],
        });

        assert_eq!(
            page.submissions()[0].fields,
            vec![
                ("csrf_token".to_string(), "t0k".to_string()),
                ("query".to_string(), "Hello".to_string()),
            ]
        );
    }
}
