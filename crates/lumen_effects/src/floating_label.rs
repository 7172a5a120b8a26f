//! Floating hint label of text inputs
//!
//! Unfocused, the label sits in the field at 16 px in a faded foreground
//! color. On focus it shrinks to 12 px and switches to the accent color.
//! The size animates; the color switches at once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lumen_animation::{AnimationListener, Animator, SchedulerHandle};
use lumen_core::{Color, DrawSurface, Point, TextStyle};

use crate::host::HostRef;

pub const LABEL_DURATION_MS: u64 = 100;

/// The per-tick step is `(target - current) / LABEL_STEPS`
pub const LABEL_STEPS: f64 = 100.0;

pub const UNFOCUSED_FONT_SIZE: f64 = 16.0;
pub const FOCUSED_FONT_SIZE: f64 = 12.0;

/// Alpha applied to the foreground for the resting label
pub const HINT_OPACITY_MASK: u32 = 0x9900_0000;

struct LabelState {
    host: HostRef,
    font_size: Cell<f64>,
    target_font_size: Cell<f64>,
    increment: Cell<f64>,
}

impl AnimationListener for LabelState {
    fn on_animation(&self, _percent: f64) {
        self.font_size
            .set(self.font_size.get() + self.increment.get());
        self.host.repaint();
    }

    fn on_stop(&self) {
        self.font_size.set(self.target_font_size.get());
        self.host.repaint();
    }

    fn on_end(&self) {
        self.font_size.set(self.target_font_size.get());
        self.host.repaint();
    }
}

pub struct MaterialFloatingLabel {
    state: Rc<LabelState>,
    animator: Animator,
    color: Cell<Color>,
    accent: Cell<Color>,
    text: RefCell<String>,
}

impl MaterialFloatingLabel {
    pub fn new(host: HostRef, scheduler: &SchedulerHandle) -> Self {
        let color = host.foreground().apply_alpha_mask(HINT_OPACITY_MASK);
        let state = Rc::new(LabelState {
            host,
            font_size: Cell::new(UNFOCUSED_FONT_SIZE),
            target_font_size: Cell::new(UNFOCUSED_FONT_SIZE),
            increment: Cell::new(0.0),
        });
        let animator = Animator::new(scheduler.clone(), state.clone());
        animator.set_delay(0).set_duration(LABEL_DURATION_MS);

        Self {
            state,
            animator,
            color: Cell::new(color),
            accent: Cell::new(Color::CYAN_500),
            text: RefCell::new(String::new()),
        }
    }

    /// Re-read the host's focus; animate the size and switch the color
    pub fn update(&self) {
        self.animator.stop();

        let state = &self.state;
        let focused = state.host.has_focus();
        let target = if focused {
            FOCUSED_FONT_SIZE
        } else {
            UNFOCUSED_FONT_SIZE
        };
        state.target_font_size.set(target);

        let current = state.font_size.get();
        if current != target {
            state.increment.set((target - current) / LABEL_STEPS);
            self.animator.start();
        }

        if focused {
            self.color.set(self.accent.get());
        } else {
            self.update_foreground();
        }
    }

    /// Re-derive the resting color from the host's foreground
    pub fn update_foreground(&self) {
        self.color.set(
            self.state
                .host
                .foreground()
                .apply_alpha_mask(HINT_OPACITY_MASK),
        );
    }

    pub fn accent(&self) -> Color {
        self.accent.get()
    }

    /// Takes effect on the next focused `update`
    pub fn set_accent(&self, accent: Color) {
        self.accent.set(accent);
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn font_size(&self) -> f64 {
        self.state.font_size.get()
    }

    pub fn target_font_size(&self) -> f64 {
        self.state.target_font_size.get()
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Draw the label with its baseline one ascent below the top edge
    pub fn paint(&self, surface: &mut dyn DrawSurface) {
        let text = self.text.borrow();
        if text.is_empty() {
            return;
        }
        let style = TextStyle::new(self.font_size() as f32).with_color(self.color());
        let metrics = surface.font_metrics(&style);
        surface.draw_text(&text, Point::new(0.0, metrics.ascent), &style);
    }
}
