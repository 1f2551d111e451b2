//! Bounded conversation history.

use super::types::{ConversationTurn, Role};

pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Returns `context` plus a new turn, keeping only the newest `max_length` turns.
pub fn append(
    context: &[ConversationTurn],
    content: &str,
    role: Role,
    max_length: usize,
) -> Vec<ConversationTurn> {
    let total = context.len() + 1;
    let skip = total.saturating_sub(max_length);
    context
        .iter()
        .cloned()
        .chain(std::iter::once(ConversationTurn {
            role,
            content: content.to_string(),
        }))
        .skip(skip)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    max_length: usize,
}

impl ContextWindow {
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn append(
        &self,
        context: &[ConversationTurn],
        content: &str,
        role: Role,
    ) -> Vec<ConversationTurn> {
        append(context, content, role, self.max_length)
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(n: usize) -> Vec<ConversationTurn> {
        (0..n)
            .map(|i| ConversationTurn::user(format!("m{i}")))
            .collect()
    }

    #[test]
    fn append_to_empty_context() {
        let out = append(&[], "hello", Role::User, 10);
        assert_eq!(out, vec![ConversationTurn::user("hello")]);
    }

    #[test]
    fn append_keeps_order_under_limit() {
        let out = append(&turns(3), "reply", Role::Assistant, 10);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].content, "m0");
        assert_eq!(out[3], ConversationTurn::assistant("reply"));
    }

    #[test]
    fn append_at_limit_drops_oldest() {
        let out = append(&turns(10), "new", Role::User, 10);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].content, "m1");
        assert_eq!(out[9].content, "new");
    }

    #[test]
    fn append_truncates_oversized_input() {
        let out = append(&turns(25), "new", Role::User, 10);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].content, "m16");
    }

    #[test]
    fn append_does_not_mutate_input() {
        let context = turns(2);
        let _ = append(&context, "x", Role::User, 1);
        assert_eq!(context, turns(2));
    }

    #[test]
    fn window_uses_its_max_length() {
        let window = ContextWindow::new(2);
        let out = window.append(&turns(5), "x", Role::Assistant);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].content, "m4");
        assert_eq!(ContextWindow::default().max_length(), DEFAULT_CONTEXT_WINDOW);
    }
}
