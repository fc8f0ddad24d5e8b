//! GlorpChat - a chat room that fills itself with spam
//!
//! The simulator owns its spam timer. Whoever closes the chat window must
//! call [`ChatSimulator::stop`] (the desktop does this in its close path)
//! so nothing is appended afterwards.

use crate::timer::{TimerId, TimerQueue};
use chrono::{DateTime, Local};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

const SPAM_MESSAGES: [&str; 10] = [
    "im glorping so hard rn",
    "GLOOOOORP",
    "glorp to the moon guys",
    "cmon guys dont sell",
    "jeeters out!",
    "holding my glorp forever",
    "who's still glorping?",
    "cant stop glorping",
    "glorp is life",
    "imagine not glorping in 2024",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub content: String,
    pub direction: MessageDirection,
    /// `HH:MM`
    pub timestamp: String,
}

impl ChatMessage {
    fn new(content: impl Into<String>, direction: MessageDirection, at: DateTime<Local>) -> Self {
        Self {
            content: content.into(),
            direction,
            timestamp: at.format("%H:%M").to_string(),
        }
    }

    pub fn is_self(&self) -> bool {
        self.direction == MessageDirection::Sent
    }
}

/// Chat pane state plus its spam timer
#[derive(Debug)]
pub struct ChatSimulator {
    messages: Vec<ChatMessage>,
    timer: Option<TimerId>,
    rng: SmallRng,
}

impl ChatSimulator {
    pub const SPAM_INTERVAL_MS: u64 = 3000;

    pub fn new(seed: u64) -> Self {
        Self {
            messages: Vec::new(),
            timer: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Start spamming; restarting replaces the previous timer
    pub fn start(&mut self, timers: &mut TimerQueue) -> TimerId {
        self.stop(timers);
        let id = timers.set_interval(Self::SPAM_INTERVAL_MS);
        self.timer = Some(id);
        id
    }

    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
            debug!(timer = %id, "Chat spam stopped");
        }
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Spam timer fired: append one random received message
    pub fn on_timer(&mut self) -> &ChatMessage {
        let line = SPAM_MESSAGES[self.rng.gen_range(0..SPAM_MESSAGES.len())];
        self.messages
            .push(ChatMessage::new(line, MessageDirection::Received, Local::now()));
        &self.messages[self.messages.len() - 1]
    }

    /// User pressed send. Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages
            .push(ChatMessage::new(text, MessageDirection::Sent, Local::now()));
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_trims_and_ignores_blank() {
        let mut chat = ChatSimulator::new(1);
        assert!(chat.send("   ").is_none());

        let message = chat.send("  gm glorpers ").unwrap();
        assert_eq!(message.content, "gm glorpers");
        assert!(message.is_self());
        assert_eq!(message.timestamp.len(), 5);
    }

    #[test]
    fn test_spam_comes_from_pool() {
        let mut chat = ChatSimulator::new(42);
        for _ in 0..20 {
            let message = chat.on_timer();
            assert_eq!(message.direction, MessageDirection::Received);
            assert!(SPAM_MESSAGES.contains(&message.content.as_str()));
        }
        assert_eq!(chat.messages().len(), 20);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let mut timers = TimerQueue::new();
        let mut chat = ChatSimulator::new(1);
        let id = chat.start(&mut timers);
        assert!(timers.is_active(id));

        chat.stop(&mut timers);
        assert!(!timers.is_active(id));
        assert_eq!(chat.timer(), None);
    }
}
