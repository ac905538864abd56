//! Chat transcript and in-flight guard for the Copilot window.

use platform_host::{ChatError, ChatMessage, ChatReply, ChatRequest};

/// First assistant turn of every conversation.
pub const GREETING: &str = "Hello! I'm your Windows Copilot. How can I help you today?";

/// Assistant turn shown when the backend fails or answers with nothing.
pub const CONNECTION_ERROR: &str =
    "Error: Could not connect to AI services. Please check your network.";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Conversation shown in one Copilot window.
pub struct Conversation {
    messages: Vec<ChatMessage>,
    in_flight: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::model(GREETING)],
            in_flight: false,
        }
    }
}

impl Conversation {
    /// Turns so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a request is awaiting its reply.
    pub fn is_waiting(&self) -> bool {
        self.in_flight
    }

    /// Appends the user turn and returns the request to send.
    ///
    /// Blank input and sends while a request is in flight return `None` and change nothing.
    pub fn begin_send(&mut self, input: &str) -> Option<ChatRequest> {
        let prompt = input.trim();
        if prompt.is_empty() || self.in_flight {
            return None;
        }
        let request = ChatRequest {
            prompt: prompt.to_string(),
            image: None,
            history: self.messages.clone(),
        };
        self.messages.push(ChatMessage::user(prompt));
        self.in_flight = true;
        Some(request)
    }

    /// Appends the assistant turn for a finished request.
    pub fn finish(&mut self, result: Result<ChatReply, ChatError>) {
        let message = match result {
            Ok(reply) if !reply.is_empty() => {
                ChatMessage::model(reply.text).with_images(reply.images)
            }
            Ok(_) | Err(_) => ChatMessage::model(CONNECTION_ERROR),
        };
        self.messages.push(message);
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{send_chat_checked, ChatRole, NoopChatService, ScriptedChatService};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn second_send_is_rejected_while_waiting() {
        let mut conversation = Conversation::default();
        let request = conversation.begin_send("  hi  ").expect("request");

        assert_eq!(request.prompt, "hi");
        assert_eq!(request.history, vec![ChatMessage::model(GREETING)]);
        assert!(conversation.is_waiting());
        assert_eq!(conversation.begin_send("again"), None);
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.begin_send("   "), None);
    }

    #[test]
    fn reply_text_is_appended_and_unlocks_input() {
        let service = ScriptedChatService::default();
        service.push(Ok(ChatReply {
            text: "Sure.".to_string(),
            images: Vec::new(),
        }));
        let mut conversation = Conversation::default();
        let request = conversation.begin_send("help").expect("request");

        conversation.finish(block_on(send_chat_checked(&service, request)));

        let last = conversation.messages().last().expect("reply");
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(last.text, "Sure.");
        assert!(!conversation.is_waiting());
        assert_eq!(service.requests()[0].history.len(), 1);
    }

    #[test]
    fn image_only_reply_keeps_its_images() {
        let mut conversation = Conversation::default();
        conversation.begin_send("draw a cat").expect("request");
        conversation.finish(Ok(ChatReply {
            text: String::new(),
            images: vec!["data:image/png;base64,AAAA".to_string()],
        }));

        let last = conversation.messages().last().expect("reply");
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(last.text, "");
        assert_eq!(last.images, vec!["data:image/png;base64,AAAA".to_string()]);
        assert!(!conversation.is_waiting());
    }

    #[test]
    fn failures_and_blank_replies_show_the_connection_error() {
        let mut conversation = Conversation::default();
        let request = conversation.begin_send("hello").expect("request");
        conversation.finish(block_on(send_chat_checked(&NoopChatService, request)));
        assert_eq!(
            conversation.messages().last().map(|m| m.text.as_str()),
            Some(CONNECTION_ERROR)
        );

        conversation.begin_send("again").expect("request");
        conversation.finish(Ok(ChatReply::default()));
        assert_eq!(conversation.messages().len(), 5);
        assert_eq!(conversation.messages()[4].text, CONNECTION_ERROR);
    }
}
