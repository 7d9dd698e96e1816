//! Prioritised command dispatch for editor plugins.
//!
//! Plugin nodes (admonitions, inline images) register handlers by command
//! name. Dispatch walks handlers from highest to lowest priority and stops at
//! the first one that reports the command handled.

use std::collections::HashMap;

use smol_str::SmolStr;

pub const INSERT_ADMONITION_COMMAND: &str = "INSERT_ADMONITION_COMMAND";
pub const INSERT_INLINE_IMAGE_COMMAND: &str = "INSERT_INLINE_IMAGE_COMMAND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandPriority {
    Editor,
    Low,
    Normal,
    High,
    Critical,
}

/// Returned by [`CommandRegistry::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

type Handler<P> = Box<dyn FnMut(&P) -> bool>;

struct Registered<P> {
    id: CommandId,
    priority: CommandPriority,
    handler: Handler<P>,
}

pub struct CommandRegistry<P> {
    next_id: u64,
    commands: HashMap<SmolStr, Vec<Registered<P>>>,
}

impl<P> Default for CommandRegistry<P> {
    fn default() -> Self {
        Self {
            next_id: 0,
            commands: HashMap::new(),
        }
    }
}

impl<P> std::fmt::Debug for CommandRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<P> CommandRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<SmolStr>,
        priority: CommandPriority,
        handler: impl FnMut(&P) -> bool + 'static,
    ) -> CommandId {
        let id = CommandId(self.next_id);
        self.next_id += 1;

        let handlers = self.commands.entry(name.into()).or_default();
        handlers.push(Registered {
            id,
            priority,
            handler: Box::new(handler),
        });
        // Stable sort keeps registration order within a priority.
        handlers.sort_by(|a, b| b.priority.cmp(&a.priority));
        id
    }

    /// Returns false if the id was not registered.
    pub fn unregister(&mut self, id: CommandId) -> bool {
        for handlers in self.commands.values_mut() {
            if let Some(pos) = handlers.iter().position(|h| h.id == id) {
                handlers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Dispatch `payload` to the handlers for `name`. Returns whether any handled it.
    pub fn dispatch(&mut self, name: &str, payload: &P) -> bool {
        let Some(handlers) = self.commands.get_mut(name) else {
            tracing::trace!(command = name, "no handlers registered");
            return false;
        };
        handlers.iter_mut().any(|h| (h.handler)(payload))
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.commands.get(name).map_or(0, Vec::len)
    }
}
