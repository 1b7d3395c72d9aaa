#![forbid(unsafe_code)]

//! Native event payloads, subscriptions, and the dispatch handle.
//!
//! [`UiEvent`] is the closed vocabulary of payloads a host surface can
//! deliver. An [`EventDescriptor`] pairs a subscription name with a pure
//! conversion from payload to application message; descriptors are plain
//! data, and the runtime owns the whole subscription lifecycle. The
//! [`Dispatcher`] is the cloneable handle a wired listener uses to hand the
//! converted message back to the dispatch loop.

use std::fmt;
use std::rc::Rc;
use std::sync::mpsc;

// ---------------------------------------------------------------------------
// UiEvent
// ---------------------------------------------------------------------------

/// Payload delivered to a listener when a native event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Pointer activation on the element.
    Click,
    /// A text control was edited; carries the control's current value.
    Input { value: String },
    /// A toggle control changed; carries the checked state.
    Toggle { checked: bool },
    /// A key was pressed while the element had focus.
    KeyDown { key: String },
}

impl UiEvent {
    /// The native event name this payload arrives under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input { .. } => "input",
            Self::Toggle { .. } => "change",
            Self::KeyDown { .. } => "keydown",
        }
    }

    /// Control value, when the payload carries one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Input { value } => Some(value),
            _ => None,
        }
    }

    /// Checked state, when the payload carries one.
    #[must_use]
    pub const fn checked(&self) -> Option<bool> {
        match self {
            Self::Toggle { checked } => Some(*checked),
            _ => None,
        }
    }

    /// Key identifier, when the payload carries one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyDown { key } => Some(key),
            _ => None,
        }
    }

    /// An `Input` payload.
    pub fn input(value: impl Into<String>) -> Self {
        Self::Input {
            value: value.into(),
        }
    }

    /// A `KeyDown` payload.
    pub fn keydown(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }
}

// ---------------------------------------------------------------------------
// EventDescriptor
// ---------------------------------------------------------------------------

/// A named subscription plus a conversion from payload to message.
///
/// Immutable once constructed. The converter is a callback, not a
/// contract: it is pure by convention, and nothing prevents side effects.
pub struct EventDescriptor<M> {
    name: &'static str,
    convert: Rc<dyn Fn(&UiEvent) -> M>,
}

impl<M> EventDescriptor<M> {
    /// Subscribe to `name`, producing messages via `convert`.
    pub fn new(name: &'static str, convert: impl Fn(&UiEvent) -> M + 'static) -> Self {
        Self {
            name,
            convert: Rc::new(convert),
        }
    }

    /// The native event name this descriptor subscribes to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Convert a payload into an application message.
    #[must_use]
    pub fn convert(&self, event: &UiEvent) -> M {
        (self.convert)(event)
    }

    /// Shared handle to the converter, for wiring into a listener closure.
    #[must_use]
    pub(crate) fn converter(&self) -> Rc<dyn Fn(&UiEvent) -> M> {
        Rc::clone(&self.convert)
    }
}

impl<M> Clone for EventDescriptor<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            convert: Rc::clone(&self.convert),
        }
    }
}

impl<M> fmt::Debug for EventDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Produce `msg` on every click.
pub fn on_click<M: Clone + 'static>(msg: M) -> EventDescriptor<M> {
    EventDescriptor::new("click", move |_| msg.clone())
}

/// Produce a message from the control's current value on every edit.
///
/// A payload of the wrong shape converts as the empty string, keeping the
/// converter total.
pub fn on_input<M>(f: impl Fn(String) -> M + 'static) -> EventDescriptor<M> {
    EventDescriptor::new("input", move |ev| f(ev.value().unwrap_or_default().to_owned()))
}

/// Produce a message from the checked state on every toggle.
pub fn on_change<M>(f: impl Fn(bool) -> M + 'static) -> EventDescriptor<M> {
    EventDescriptor::new("change", move |ev| f(ev.checked().unwrap_or_default()))
}

/// Produce a message from the key identifier on every key press.
pub fn on_keydown<M>(f: impl Fn(String) -> M + 'static) -> EventDescriptor<M> {
    EventDescriptor::new("keydown", move |ev| f(ev.key().unwrap_or_default().to_owned()))
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Cloneable handle that delivers messages to the dispatch loop.
///
/// Listener callbacks hold one of these; `send` enqueues the message in
/// arrival order. When the receiving loop is gone the message is dropped
/// silently — a fire after teardown has nowhere to go.
pub struct Dispatcher<M> {
    tx: mpsc::Sender<M>,
}

impl<M> Dispatcher<M> {
    /// Wrap the sending half of the loop's inbox.
    #[must_use]
    pub fn new(tx: mpsc::Sender<M>) -> Self {
        Self { tx }
    }

    /// Enqueue a message for the next pump of the dispatch loop.
    pub fn send(&self, msg: M) {
        let _ = self.tx.send(msg);
    }
}

impl<M> Clone for Dispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<M> fmt::Debug for Dispatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Msg {
        Clicked,
        Typed(String),
        Toggled(bool),
        Pressed(String),
    }

    #[test]
    fn event_names() {
        assert_eq!(UiEvent::Click.name(), "click");
        assert_eq!(UiEvent::input("x").name(), "input");
        assert_eq!(UiEvent::Toggle { checked: true }.name(), "change");
        assert_eq!(UiEvent::keydown("Enter").name(), "keydown");
    }

    #[test]
    fn click_converter_ignores_payload_details() {
        let d = on_click(Msg::Clicked);
        assert_eq!(d.name(), "click");
        assert_eq!(d.convert(&UiEvent::Click), Msg::Clicked);
    }

    #[test]
    fn input_converter_extracts_value() {
        let d = on_input(Msg::Typed);
        assert_eq!(d.convert(&UiEvent::input("Ada")), Msg::Typed("Ada".into()));
    }

    #[test]
    fn mismatched_payload_converts_to_default() {
        let d = on_input(Msg::Typed);
        assert_eq!(d.convert(&UiEvent::Click), Msg::Typed(String::new()));
        let d = on_change(Msg::Toggled);
        assert_eq!(d.convert(&UiEvent::Click), Msg::Toggled(false));
    }

    #[test]
    fn keydown_converter_extracts_key() {
        let d = on_keydown(Msg::Pressed);
        assert_eq!(
            d.convert(&UiEvent::keydown("Enter")),
            Msg::Pressed("Enter".into())
        );
    }

    #[test]
    fn descriptor_clones_share_the_converter() {
        let d = on_change(Msg::Toggled);
        let e = d.clone();
        assert_eq!(
            d.convert(&UiEvent::Toggle { checked: true }),
            e.convert(&UiEvent::Toggle { checked: true })
        );
    }

    #[test]
    fn dispatcher_delivers_in_order() {
        let (tx, rx) = mpsc::channel();
        let d = Dispatcher::new(tx);
        d.send(Msg::Clicked);
        d.clone().send(Msg::Toggled(true));
        assert_eq!(rx.try_recv().ok(), Some(Msg::Clicked));
        assert_eq!(rx.try_recv().ok(), Some(Msg::Toggled(true)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dispatcher_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel::<Msg>();
        let d = Dispatcher::new(tx);
        drop(rx);
        d.send(Msg::Clicked);
    }
}
