//! Chat assistant service boundary.
//!
//! The desktop only depends on this request/response contract; a networked backend is injected
//! by the entry layer.

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Object-safe boxed future returned by [`ChatService`].
pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Author of a conversation turn.
pub enum ChatRole {
    /// Person typing into the assistant.
    User,
    /// Assistant reply.
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One conversation turn.
pub struct ChatMessage {
    /// Turn author.
    pub role: ChatRole,
    /// Turn text.
    pub text: String,
    /// Images attached to the turn as data URIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            images: Vec::new(),
        }
    }

    /// Creates an assistant turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            images: Vec::new(),
        }
    }

    /// Attaches images to the turn.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Request sent to the assistant backend.
pub struct ChatRequest {
    /// New prompt text.
    pub prompt: String,
    /// Optional attached image as a data URI.
    pub image: Option<String>,
    /// Prior turns, oldest first.
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Backend reply.
pub struct ChatReply {
    /// Reply text, possibly empty.
    pub text: String,
    /// Generated images as data URIs.
    pub images: Vec<String>,
}

impl ChatReply {
    /// Returns `true` when the reply carries neither text nor images.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Assistant backend failures.
pub enum ChatError {
    /// No backend is configured.
    #[error("chat service unavailable")]
    Unavailable,
    /// The backend answered with nothing.
    #[error("chat service returned an empty reply")]
    EmptyReply,
    /// The request failed in transit.
    #[error("chat transport failed: {0}")]
    Transport(String),
}

/// Host service for the chat assistant.
pub trait ChatService {
    /// Sends a prompt with its conversation history.
    fn send_chat<'a>(&'a self, request: ChatRequest) -> ChatFuture<'a, Result<ChatReply, ChatError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Service used when no backend is configured.
pub struct NoopChatService;

impl ChatService for NoopChatService {
    fn send_chat<'a>(
        &'a self,
        _request: ChatRequest,
    ) -> ChatFuture<'a, Result<ChatReply, ChatError>> {
        Box::pin(async { Err(ChatError::Unavailable) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory service answering from a queue of canned results and recording requests.
pub struct ScriptedChatService {
    replies: Rc<RefCell<VecDeque<Result<ChatReply, ChatError>>>>,
    requests: Rc<RefCell<Vec<ChatRequest>>>,
}

impl ScriptedChatService {
    /// Queues the next result.
    pub fn push(&self, result: Result<ChatReply, ChatError>) {
        self.replies.borrow_mut().push_back(result);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.borrow().clone()
    }
}

impl ChatService for ScriptedChatService {
    fn send_chat<'a>(&'a self, request: ChatRequest) -> ChatFuture<'a, Result<ChatReply, ChatError>> {
        Box::pin(async move {
            self.requests.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ChatError::Unavailable))
        })
    }
}

/// Sends a request and folds empty replies into [`ChatError::EmptyReply`].
///
/// # Errors
///
/// Returns the backend error, or [`ChatError::EmptyReply`] for a blank answer.
pub async fn send_chat_checked<S: ChatService + ?Sized>(
    service: &S,
    request: ChatRequest,
) -> Result<ChatReply, ChatError> {
    let reply = service.send_chat(request).await?;
    if reply.is_empty() {
        return Err(ChatError::EmptyReply);
    }
    Ok(reply)
}
