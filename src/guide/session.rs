//! Chat session: the message log behind the guide panel.
//!
//! A session lives as long as the chat panel is open. It starts with the
//! greeting, only ever appends, and lets one request be outstanding at a time.
//! Sending is split into `submit` (accept input, mark awaiting, hand back the
//! request) and `resolve` (append the reply, clear awaiting) so the caller can
//! run the network call wherever it likes. `ask` does both inline.

use std::fmt;

use crate::catalog::Catalog;
use crate::guide::prompt::{self, FALLBACK_REPLY, GREETING};
use crate::guide::{GuideBackend, GuideReply, GuideRequest};
use crate::logging::{self, Component};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    awaiting: bool,
    pending_context: Option<String>,
    system_instruction: String,
}

impl ChatSession {
    pub fn new(catalog: &Catalog) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 1,
            awaiting: false,
            pending_context: None,
            system_instruction: prompt::system_instruction(catalog),
        };
        session.push(Sender::Ai, GREETING.to_string());
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a request is outstanding. The send control is disabled.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Whether the send control would be enabled for `input`.
    pub fn can_send(&self, input: &str) -> bool {
        !self.awaiting && !input.trim().is_empty()
    }

    fn push(&mut self, sender: Sender, text: String) -> &ChatMessage {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage { id, sender, text });
        // Just pushed, so the log is non-empty.
        &self.messages[self.messages.len() - 1]
    }

    /// Accepts `input` and returns the request to send, or `None` if the
    /// input is blank or a request is already outstanding. On `None` nothing
    /// changes.
    pub fn submit(&mut self, input: &str, context: Option<&str>) -> Option<GuideRequest> {
        if input.trim().is_empty() {
            return None;
        }
        if self.awaiting {
            logging::debug(Component::Guide, context, "send ignored: reply still pending");
            return None;
        }

        self.push(Sender::User, input.to_string());
        self.awaiting = true;
        self.pending_context = context.map(String::from);

        Some(GuideRequest {
            system_instruction: self.system_instruction.clone(),
            prompt: prompt::compose_prompt(input, context),
            context: context.map(String::from),
        })
    }

    /// Appends the reply for the outstanding request and re-enables sending.
    /// A failure is logged and shown as the fallback text. With no request
    /// outstanding this is a no-op and returns `None`.
    pub fn resolve(&mut self, reply: GuideReply) -> Option<&ChatMessage> {
        if !self.awaiting {
            logging::debug(Component::Guide, None, "reply ignored: nothing pending");
            return None;
        }
        self.awaiting = false;
        let context = self.pending_context.take();

        let text = match reply {
            GuideReply::Answered(text) => text,
            GuideReply::Failed(err) => {
                logging::log_guide_failure(context.as_deref(), "generateContent", &err);
                FALLBACK_REPLY.to_string()
            }
        };
        Some(self.push(Sender::Ai, text))
    }

    /// Submit, call `backend`, resolve. Returns the appended reply, or `None`
    /// if the input was rejected and no call was made.
    pub fn ask(
        &mut self,
        backend: &dyn GuideBackend,
        input: &str,
        context: Option<&str>,
    ) -> Option<&ChatMessage> {
        let request = self.submit(input, context)?;
        let reply = GuideReply::from(backend.generate(&request));
        self.resolve(reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::MockGuideBackend;
    use crate::model::GuideError;

    fn session() -> ChatSession {
        ChatSession::new(&Catalog::builtin().unwrap())
    }

    #[test]
    fn test_new_session_is_seeded_with_greeting() {
        let session = session();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Ai);
        assert_eq!(session.messages()[0].text, GREETING);
        assert!(!session.is_awaiting());
    }

    #[test]
    fn test_blank_input_makes_no_call() {
        let mut backend = MockGuideBackend::new();
        backend.expect_generate().times(0);

        let mut session = session();
        for input in ["", "   ", "\n\t"] {
            assert!(session.ask(&backend, input, None).is_none());
        }
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_success_appends_user_then_ai_message() {
        let mut backend = MockGuideBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Ok("جرّب محمية جزر فرسان للغوص.".to_string()));

        let mut session = session();
        let reply = session.ask(&backend, "أين أغوص؟", None).cloned().unwrap();
        assert_eq!(reply.sender, Sender::Ai);
        assert_eq!(reply.text, "جرّب محمية جزر فرسان للغوص.");

        let senders: Vec<_> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Ai, Sender::User, Sender::Ai]);
        assert_eq!(session.messages()[1].text, "أين أغوص؟");
        assert!(!session.is_awaiting());
    }

    #[test]
    fn test_failure_appends_exactly_one_fallback() {
        let mut backend = MockGuideBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Err(GuideError::Transport("connection refused".into())));

        let mut session = session();
        session.ask(&backend, "سؤال", None);

        assert_eq!(session.messages().len(), 3);
        let last = session.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, FALLBACK_REPLY);
        let fallbacks = session.messages().iter().filter(|m| m.text == FALLBACK_REPLY).count();
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn test_empty_model_reply_uses_fallback() {
        let mut session = session();
        session.submit("hello", None).unwrap();
        let reply = session.resolve(GuideReply::Failed(GuideError::EmptyResponse)).unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
    }

    #[test]
    fn test_second_resolve_for_one_request_is_ignored() {
        let mut session = session();
        session.submit("q", None).unwrap();
        assert!(session.resolve(GuideReply::Failed(GuideError::EmptyResponse)).is_some());
        assert!(session.resolve(GuideReply::Failed(GuideError::EmptyResponse)).is_none());

        assert_eq!(session.messages().len(), 3);
        let fallbacks = session.messages().iter().filter(|m| m.text == FALLBACK_REPLY).count();
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn test_resolve_without_submit_appends_nothing() {
        let mut session = session();
        assert!(session.resolve(GuideReply::Answered("unsolicited".into())).is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_second_submit_while_awaiting_is_rejected() {
        let mut session = session();
        assert!(session.submit("first", None).is_some());
        assert!(session.is_awaiting());
        assert!(!session.can_send("second"));

        let before = session.messages().len();
        assert!(session.submit("second", None).is_none());
        assert_eq!(session.messages().len(), before);

        session.resolve(GuideReply::Answered("ok".into()));
        assert!(session.submit("second", None).is_some());
    }

    #[test]
    fn test_request_carries_context_and_instruction() {
        let mut session = session();
        let request = session.submit("متى أزور؟", Some("محمية جزر فرسان")).unwrap();
        assert!(request.prompt.starts_with("المستخدم يسأل وهو يتصفح صفحة: محمية جزر فرسان."));
        assert!(request.prompt.ends_with("السؤال: متى أزور؟"));
        assert!(request.system_instruction.contains("محمية جزر فرسان"));
        assert_eq!(request.context.as_deref(), Some("محمية جزر فرسان"));
    }

    #[test]
    fn test_history_is_not_replayed() {
        let mut session = session();
        session.submit("first question", None).unwrap();
        session.resolve(GuideReply::Answered("first answer".into()));

        let request = session.submit("second question", None).unwrap();
        assert_eq!(request.prompt, "second question");
        assert!(!request.system_instruction.contains("first"));
    }

    #[test]
    fn test_message_ids_are_unique_and_increasing() {
        let mut backend = MockGuideBackend::new();
        backend.expect_generate().times(3).returning(|_| Ok("r".into()));

        let mut session = session();
        for q in ["a", "b", "c"] {
            session.ask(&backend, q, None);
        }
        let ids: Vec<_> = session.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn test_user_text_is_kept_as_typed() {
        let mut session = session();
        session.submit("  spaced  ", None).unwrap();
        assert_eq!(session.messages()[1].text, "  spaced  ");
    }
}
