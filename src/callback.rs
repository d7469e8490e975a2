//! The three handler maps an embedder registers against: one per IAC
//! command, one per SLC function, one per decoded sub-negotiation kind.
//! Mirrors the `set_callback`/`set_slc_callback`/`set_ext_callback` surface
//! this engine's design is descended from, but keyed by sum types instead of
//! raw command bytes.

use std::collections::HashMap;
use std::fmt;

use crate::event::{ExtEvent, ExtKind, IacCommand};
use crate::linemode::SlcFunction;

type IacHandler = Box<dyn FnMut(IacCommand) + Send>;
type SlcHandler = Box<dyn FnMut(SlcFunction, u8) + Send>;
type ExtHandler = Box<dyn FnMut(ExtEvent) + Send>;

/// Holds the callbacks an embedder has registered for IAC commands, SLC
/// functions, and decoded sub-negotiations. A function with no registered
/// handler is simply logged and dropped - matching the "this would be
/// silently ignored" default of the protocol engine this design follows.
pub struct CallbackRegistry {
    iac: HashMap<IacCommand, IacHandler>,
    slc: HashMap<SlcFunction, SlcHandler>,
    ext: HashMap<ExtKind, ExtHandler>,
}

impl CallbackRegistry {
    #[must_use]
    pub fn new() -> Self {
        CallbackRegistry { iac: HashMap::new(), slc: HashMap::new(), ext: HashMap::new() }
    }

    pub fn set_iac_callback<F>(&mut self, cmd: IacCommand, handler: F)
    where
        F: FnMut(IacCommand) + Send + 'static,
    {
        self.iac.insert(cmd, Box::new(handler));
    }

    pub fn set_slc_callback<F>(&mut self, func: SlcFunction, handler: F)
    where
        F: FnMut(SlcFunction, u8) + Send + 'static,
    {
        self.slc.insert(func, Box::new(handler));
    }

    pub fn set_ext_callback<F>(&mut self, kind: ExtKind, handler: F)
    where
        F: FnMut(ExtEvent) + Send + 'static,
    {
        self.ext.insert(kind, Box::new(handler));
    }

    /// Dispatches `cmd` to its registered handler, if any; otherwise logs it
    /// at debug level and drops it.
    pub fn dispatch_iac(&mut self, cmd: IacCommand) {
        match self.iac.get_mut(&cmd) {
            Some(handler) => handler(cmd),
            None => tracing::debug!(?cmd, "unhandled IAC command"),
        }
    }

    /// Dispatches a just-triggered SLC function and the byte value that
    /// triggered it.
    pub fn dispatch_slc(&mut self, func: SlcFunction, value: u8) {
        match self.slc.get_mut(&func) {
            Some(handler) => handler(func, value),
            None => tracing::debug!(?func, value, "unhandled SLC function"),
        }
    }

    /// Dispatches a decoded sub-negotiation to the handler registered for
    /// its kind.
    pub fn dispatch_ext(&mut self, event: ExtEvent) {
        let kind = event.kind();
        match self.ext.get_mut(&kind) {
            Some(handler) => handler(event),
            None => tracing::debug!(?kind, "unhandled sub-negotiation"),
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        CallbackRegistry::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("iac_handlers", &self.iac.len())
            .field("slc_handlers", &self.slc.len())
            .field("ext_handlers", &self.ext.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn unregistered_iac_command_does_not_panic() {
        let mut registry = CallbackRegistry::new();
        registry.dispatch_iac(IacCommand::Ayt);
    }

    #[test]
    fn registered_iac_handler_is_invoked() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = seen.clone();
        let mut registry = CallbackRegistry::new();
        registry.set_iac_callback(IacCommand::Ip, move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });
        registry.dispatch_iac(IacCommand::Ip);
        registry.dispatch_iac(IacCommand::Ao);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ext_handler_is_keyed_by_kind_not_payload() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = seen.clone();
        let mut registry = CallbackRegistry::new();
        registry.set_ext_callback(ExtKind::Ttype, move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });
        registry.dispatch_ext(ExtEvent::Ttype("xterm".to_string()));
        registry.dispatch_ext(ExtEvent::Ttype("ansi".to_string()));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
