//! The widget side of an effect
//!
//! Effects never own their widget. They keep a [`HostRef`] (a weak
//! reference) and use it to read geometry, focus and visibility and to ask
//! for repaints. Once the widget is gone every read falls back to a neutral
//! default and repaint requests are dropped.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use lumen_core::{Color, Size};

/// What an effect may ask of the widget it decorates
pub trait EffectHost {
    /// Current bounds size
    fn size(&self) -> Size;

    /// Whether the widget is on screen; hidden widgets skip animations
    fn is_showing(&self) -> bool {
        true
    }

    /// Whether the widget owns keyboard focus
    fn has_focus(&self) -> bool {
        false
    }

    fn foreground(&self) -> Color {
        Color::BLACK
    }

    fn background(&self) -> Color {
        Color::WHITE
    }

    /// Flat-styled widgets get a brightness blend instead of a shadow
    fn is_flat(&self) -> bool {
        false
    }

    /// Fire-and-forget repaint request; the host coalesces these
    fn request_repaint(&self);
}

/// Non-owning reference from an effect back to its host
#[derive(Clone)]
pub struct HostRef {
    host: Weak<dyn EffectHost>,
}

impl HostRef {
    pub fn new<H: EffectHost + 'static>(host: &Rc<H>) -> Self {
        let host = Rc::downgrade(host);
        let host: Weak<dyn EffectHost> = host;
        Self { host }
    }

    /// A reference that was never attached to a widget
    pub fn detached() -> Self {
        let host: Weak<dyn EffectHost> = Weak::<HeadlessHost>::new();
        Self { host }
    }

    pub fn upgrade(&self) -> Option<Rc<dyn EffectHost>> {
        self.host.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.host.strong_count() > 0
    }

    pub fn size(&self) -> Size {
        self.upgrade().map_or(Size::ZERO, |host| host.size())
    }

    pub fn is_showing(&self) -> bool {
        self.upgrade().is_some_and(|host| host.is_showing())
    }

    pub fn has_focus(&self) -> bool {
        self.upgrade().is_some_and(|host| host.has_focus())
    }

    pub fn foreground(&self) -> Color {
        self.upgrade().map_or(Color::BLACK, |host| host.foreground())
    }

    pub fn background(&self) -> Color {
        self.upgrade().map_or(Color::WHITE, |host| host.background())
    }

    pub fn is_flat(&self) -> bool {
        self.upgrade().is_some_and(|host| host.is_flat())
    }

    pub fn repaint(&self) {
        if let Some(host) = self.upgrade() {
            host.request_repaint();
        }
    }
}

impl std::fmt::Debug for HostRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostRef")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A plain host with settable properties
///
/// Used by offscreen renderers and tests that drive effects without a real
/// widget tree. Repaint requests are only counted.
#[derive(Debug)]
pub struct HeadlessHost {
    size: Cell<Size>,
    showing: Cell<bool>,
    focused: Cell<bool>,
    flat: Cell<bool>,
    foreground: Cell<Color>,
    background: Cell<Color>,
    repaints: Cell<u64>,
}

impl HeadlessHost {
    /// A visible, unfocused, raised host
    pub fn new(size: Size) -> Rc<Self> {
        Rc::new(Self {
            size: Cell::new(size),
            showing: Cell::new(true),
            focused: Cell::new(false),
            flat: Cell::new(false),
            foreground: Cell::new(Color::BLACK),
            background: Cell::new(Color::WHITE),
            repaints: Cell::new(0),
        })
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn set_showing(&self, showing: bool) {
        self.showing.set(showing);
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }

    pub fn set_flat(&self, flat: bool) {
        self.flat.set(flat);
    }

    pub fn set_foreground(&self, color: Color) {
        self.foreground.set(color);
    }

    pub fn set_background(&self, color: Color) {
        self.background.set(color);
    }

    /// Number of repaint requests received so far
    pub fn repaint_count(&self) -> u64 {
        self.repaints.get()
    }
}

impl EffectHost for HeadlessHost {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn is_showing(&self) -> bool {
        self.showing.get()
    }

    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn foreground(&self) -> Color {
        self.foreground.get()
    }

    fn background(&self) -> Color {
        self.background.get()
    }

    fn is_flat(&self) -> bool {
        self.flat.get()
    }

    fn request_repaint(&self) {
        self.repaints.set(self.repaints.get() + 1);
    }
}
