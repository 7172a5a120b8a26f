//! Floating label tests
//!
//! A full text field: background, resting rule, focus line and the floating
//! label. Text is collected rather than rasterized, so the label shows up in
//! the logged text runs while the frame captures the rest of the field.

use crate::harness::TestContext;
use crate::runner::TestSuite;
use lumen_core::{Color, DrawSurfaceExt, Rect, Size};
use lumen_effects::{HeadlessHost, HostRef, MaterialFloatingLabel, MaterialLine};
use std::rc::Rc;

const FIELD_SIZE: Size = Size::new(240.0, 56.0);

struct TextField {
    host: Rc<HeadlessHost>,
    label: MaterialFloatingLabel,
    line: MaterialLine,
}

impl TextField {
    fn new(ctx: &TestContext, hint: &str) -> Self {
        let host = HeadlessHost::new(FIELD_SIZE);
        host.set_foreground(Color::from_hex(0x212121));
        let label = MaterialFloatingLabel::new(HostRef::new(&host), &ctx.scheduler());
        label.set_text(hint);
        let line = MaterialLine::new(HostRef::new(&host), &ctx.scheduler());
        Self { host, label, line }
    }

    fn set_focused(&self, focused: bool) {
        self.host.set_focused(focused);
        self.label.update();
        self.line.update();
    }

    fn paint(&self, ctx: &mut TestContext) {
        ctx.clear(Color::from_hex(0xF5F5F5));
        let surface = ctx.surface();
        surface.fill_rect(
            Rect::new(0.0, FIELD_SIZE.height - 4.0, FIELD_SIZE.width, 1.0),
            self.label.color(),
        );
        self.line.paint(surface, self.label.accent());
        self.label.paint(surface);
    }
}

/// Create the floating label test suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("label");

    suite.add_with_size("resting", 240, 56, |ctx| {
        let field = TextField::new(ctx, "Email");
        field.paint(ctx);
    });

    suite.add_with_size("floating", 240, 56, |ctx| {
        let field = TextField::new(ctx, "Email");
        field.set_focused(true);
        ctx.settle();
        field.paint(ctx);
    });

    suite.add_with_size("floating_custom_accent", 240, 56, |ctx| {
        let field = TextField::new(ctx, "Password");
        field.label.set_accent(Color::from_hex(0xE91E63));
        field.set_focused(true);
        ctx.settle();
        field.paint(ctx);
    });

    suite.add_with_size("sinking", 240, 56, |ctx| {
        let field = TextField::new(ctx, "Email");
        field.set_focused(true);
        ctx.settle();
        field.set_focused(false);
        ctx.advance(48);
        field.paint(ctx);
    });

    // Dark theme: the resting color follows the new foreground
    suite.add_with_size("foreground_change", 240, 56, |ctx| {
        let field = TextField::new(ctx, "Search");
        field.host.set_foreground(Color::WHITE);
        field.label.update_foreground();

        ctx.clear(Color::from_hex(0x303030));
        let surface = ctx.surface();
        surface.fill_rect(
            Rect::new(0.0, FIELD_SIZE.height - 4.0, FIELD_SIZE.width, 1.0),
            field.label.color(),
        );
        field.label.paint(surface);
    });

    suite
}
