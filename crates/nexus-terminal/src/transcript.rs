//! Transcript: the ordered record of everything shown in the terminal.
//!
//! Append-only, with two exceptions: [`MessageLog::replace_all`] for `clear`
//! and [`MessageLog::remove`] for dropping a placeholder once its deferred
//! result lands. Entries are addressed by [`MessageId`], never by position
//! or content.

use std::fmt;

/// Stable identity of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Provenance of a message; decides styling and whether it is typed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    System,
    User,
    Ai,
}

/// Typing state of a message.
///
/// `Ai` replies go `Pending -> Revealing -> Settled`. A reveal that is
/// superseded ends in `Interrupted` with its partial prefix left in place.
/// `System`, `User` and placeholder entries start out `Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealing,
    Settled,
    Interrupted,
}

/// One transcript entry.
#[derive(Debug, Clone)]
pub struct Message {
    id: MessageId,
    kind: MessageKind,
    text: String,
    visible: String,
    state: RevealState,
    placeholder: bool,
}

impl Message {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Full canonical content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Portion revealed so far. Equals [`Message::text`] once settled.
    pub fn visible(&self) -> &str {
        &self.visible
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealing(&self) -> bool {
        self.state == RevealState::Revealing
    }

    /// Whether this is a transient "working" line awaiting its result.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub(crate) fn set_visible(&mut self, prefix: &str) {
        self.visible.clear();
        self.visible.push_str(prefix);
    }

    pub(crate) fn set_state(&mut self, state: RevealState) {
        self.state = state;
    }
}

/// Blueprint for a message that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewMessage {
    kind: MessageKind,
    text: String,
    placeholder: bool,
}

impl NewMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::System,
            text: text.into(),
            placeholder: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            text: text.into(),
            placeholder: false,
        }
    }

    /// An `Ai` reply that will be typed out.
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Ai,
            text: text.into(),
            placeholder: false,
        }
    }

    /// An `Ai` working line, fully visible from the start.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Ai,
            text: text.into(),
            placeholder: true,
        }
    }
}

/// Ordered, id-addressed transcript.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u64,
    generation: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its id.
    pub fn push(&mut self, new: NewMessage) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        let typed = new.kind == MessageKind::Ai && !new.placeholder;
        let (visible, state) = if typed {
            (String::new(), RevealState::Pending)
        } else {
            (new.text.clone(), RevealState::Settled)
        };
        self.messages.push(Message {
            id,
            kind: new.kind,
            text: new.text,
            visible,
            state,
            placeholder: new.placeholder,
        });
        id
    }

    /// Remove the entry with `id`. Returns `false` if it is already gone.
    pub fn remove(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Replace the whole transcript. Ids keep increasing so nothing issued
    /// before the replacement can address an entry created after it.
    pub fn replace_all(&mut self, entries: Vec<NewMessage>) -> Vec<MessageId> {
        self.messages.clear();
        self.generation += 1;
        entries.into_iter().map(|m| self.push(m)).collect()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Entries in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every [`MessageLog::replace_all`]; lets renderers notice a
    /// wholesale reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of entries currently being typed out.
    pub fn revealing_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_revealing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_replies_start_pending_and_empty() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai("hello"));
        let msg = log.get(id).unwrap();
        assert_eq!(msg.state(), RevealState::Pending);
        assert_eq!(msg.visible(), "");
        assert_eq!(msg.text(), "hello");
    }

    #[test]
    fn system_user_and_placeholder_are_settled() {
        let mut log = MessageLog::new();
        let sys = log.push(NewMessage::system("banner"));
        let user = log.push(NewMessage::user("status"));
        let ph = log.push(NewMessage::placeholder("Fetching network status... "));
        for id in [sys, user, ph] {
            let msg = log.get(id).unwrap();
            assert_eq!(msg.state(), RevealState::Settled);
            assert_eq!(msg.visible(), msg.text());
        }
        assert!(log.get(ph).unwrap().is_placeholder());
        assert_eq!(log.get(ph).unwrap().kind(), MessageKind::Ai);
    }

    #[test]
    fn insertion_order_is_display_order() {
        let mut log = MessageLog::new();
        log.push(NewMessage::user("a"));
        log.push(NewMessage::user("a"));
        log.push(NewMessage::user("b"));
        let texts: Vec<_> = log.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["a", "a", "b"]);
    }

    #[test]
    fn remove_targets_only_the_given_id() {
        let mut log = MessageLog::new();
        let first = log.push(NewMessage::placeholder("Scanning mempool... "));
        let second = log.push(NewMessage::placeholder("Scanning mempool... "));
        assert!(log.remove(first));
        assert!(!log.remove(first));
        assert_eq!(log.len(), 1);
        assert!(log.get(second).is_some());
    }

    #[test]
    fn replace_all_resets_and_bumps_generation() {
        let mut log = MessageLog::new();
        let old = log.push(NewMessage::user("x"));
        let ids = log.replace_all(vec![NewMessage::system("s"), NewMessage::ai("t")]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.generation(), 1);
        assert!(log.get(old).is_none());
        assert!(ids.iter().all(|id| *id > old));
    }
}
