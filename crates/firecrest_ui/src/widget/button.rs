//! Clickable buttons.

use super::ColoredRect;
use crate::alignment::ElementAlignment;
use crate::config::ButtonConfig;
use crate::element::{Element, ElementContext, ElementId};
use crate::events::{ButtonAction, MotionAction, MouseButtonEvent, MouseMotionEvent};
use crate::input::{Input, MouseButton};
use crate::layout::{HorizontalCenterer, VerticalCenterer};
use crate::text::Text;
use crate::tree::ElementTree;
use firecrest_core::Color;

/// Background colors of a button's three states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonColors {
    /// Pointer elsewhere.
    pub normal: Color,
    /// Pointer over the button.
    pub hover: Color,
    /// Left button held on the button.
    pub click: Color,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: Color::rgb(0.25, 0.25, 0.3),
            hover: Color::rgb(0.35, 0.35, 0.42),
            click: Color::rgb(0.18, 0.18, 0.22),
        }
    }
}

/// A rounded, focusable button with a centred label.
pub struct Button {
    pending_label: Option<Text>,
    colors: ButtonColors,
    corner_radius: f32,
    on_click: Box<dyn FnMut()>,
    background: Option<ElementId>,
    label: Option<ElementId>,
}

impl Button {
    /// Creates a button showing `label`.
    #[must_use]
    pub fn new(label: Text, config: &ButtonConfig) -> Self {
        Self {
            pending_label: Some(label.wrap_tightly(true)),
            colors: ButtonColors::default(),
            corner_radius: config.corner_radius,
            on_click: Box::new(|| {}),
            background: None,
            label: None,
        }
    }

    /// Replaces the state colors.
    #[must_use]
    pub fn with_colors(mut self, colors: ButtonColors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the callback run on every left press.
    #[must_use]
    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Box::new(f);
        self
    }

    /// The label element.
    #[must_use]
    pub fn label_id(&self) -> Option<ElementId> {
        self.label
    }

    /// Current background color.
    #[must_use]
    pub fn background_color(&self, tree: &ElementTree) -> Option<Color> {
        tree.get::<ColoredRect>(self.background?).map(|rect| rect.color)
    }

    /// Replaces the label text.
    pub fn set_label(&mut self, cx: &mut ElementContext<'_>, text: impl Into<String>) {
        if let Some(id) = self.label {
            let text = text.into();
            cx.tree_mut().with_element::<Text, _>(id, |t, cx| t.set_text(cx, text));
        }
    }

    fn paint(&self, cx: &mut ElementContext<'_>, color: Color) {
        if let Some(rect) = self.background.and_then(|id| cx.tree_mut().get_mut::<ColoredRect>(id)) {
            rect.color = color;
        }
    }

    fn build(&mut self, cx: &mut ElementContext<'_>, label: Text) -> crate::error::UiResult<()> {
        let background = cx.create_child(
            ElementAlignment::default(),
            ColoredRect::rounded(self.colors.normal, self.corner_radius),
        )?;
        let vertical = cx.create_child(ElementAlignment::default(), VerticalCenterer)?;
        let tree = cx.tree_mut();
        let horizontal = tree.create_child(vertical, ElementAlignment::default(), HorizontalCenterer)?;
        let label = tree.create_child(horizontal, ElementAlignment::default(), label)?;

        self.background = Some(background);
        self.label = Some(label);
        Ok(())
    }
}

impl Element for Button {
    fn layout(&self) -> Option<Box<dyn crate::layout::Layout>> {
        Some(Box::new(crate::layout::FreeLayout))
    }

    fn created(&mut self, cx: &mut ElementContext<'_>) {
        cx.set_focusable(true);
        if let Some(label) = self.pending_label.take() {
            if let Err(e) = self.build(cx, label) {
                tracing::warn!("cannot build button {:?}: {}", cx.id(), e);
            }
        }
    }

    fn on_mouse_motion(&mut self, cx: &mut ElementContext<'_>, _input: &Input, event: MouseMotionEvent) {
        match event.action {
            MotionAction::Enter => self.paint(cx, self.colors.hover),
            MotionAction::Exit => self.paint(cx, self.colors.normal),
            MotionAction::Move => {}
        }
    }

    fn on_mouse_button(&mut self, cx: &mut ElementContext<'_>, _input: &Input, event: MouseButtonEvent) {
        if event.button != MouseButton::Left {
            return;
        }
        match event.action {
            ButtonAction::Press => {
                self.paint(cx, self.colors.click);
                (self.on_click)();
            }
            ButtonAction::Release => self.paint(cx, self.colors.hover),
        }
    }
}
