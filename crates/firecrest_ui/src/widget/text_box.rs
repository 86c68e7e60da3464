//! Text on a background that fits the text.

use super::ColoredRect;
use crate::alignment::{Align, ElementAlignment};
use crate::element::{Element, ElementContext, ElementId};
use crate::layout::{ContentLayout, Layout};
use crate::text::Text;
use crate::tree::ElementTree;
use firecrest_core::Color;

/// A tight [`Text`] over a [`ColoredRect`].
///
/// The alignment the box is created with bounds the text: its width is the
/// widest the text may grow before wrapping. The box itself then mirrors
/// the text's size.
pub struct TextBox {
    pending: Option<Text>,
    background: Color,
    text_id: Option<ElementId>,
    background_id: Option<ElementId>,
}

impl TextBox {
    /// Creates a box around `text`.
    #[must_use]
    pub fn new(text: Text, background: Color) -> Self {
        Self {
            pending: Some(text.wrap_tightly(true)),
            background,
            text_id: None,
            background_id: None,
        }
    }

    /// The text child.
    #[must_use]
    pub fn text_id(&self) -> Option<ElementId> {
        self.text_id
    }

    /// The background child.
    #[must_use]
    pub fn background_id(&self) -> Option<ElementId> {
        self.background_id
    }

    /// Current text.
    #[must_use]
    pub fn text<'t>(&self, tree: &'t ElementTree) -> Option<&'t str> {
        tree.get::<Text>(self.text_id?).map(Text::text)
    }

    /// Replaces the text; the box refits right away.
    pub fn set_text(&mut self, cx: &mut ElementContext<'_>, text: impl Into<String>) {
        if let Some(id) = self.text_id {
            let text = text.into();
            cx.tree_mut().with_element::<Text, _>(id, |t, cx| t.set_text(cx, text));
        }
    }

    /// Changes the background color.
    pub fn set_background(&mut self, cx: &mut ElementContext<'_>, color: Color) {
        self.background = color;
        if let Some(rect) = self.background_id.and_then(|id| cx.tree_mut().get_mut::<ColoredRect>(id)) {
            rect.color = color;
        }
    }
}

impl Element for TextBox {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(ContentLayout))
    }

    fn created(&mut self, cx: &mut ElementContext<'_>) {
        let Some(text) = self.pending.take() else {
            return;
        };
        let requested = cx.alignment().cloned().unwrap_or_default();

        let background = cx.create_child(ElementAlignment::default(), ColoredRect::new(self.background));
        let label = cx.create_child(
            ElementAlignment::new(0.0, 0.0, requested.width, requested.height),
            text,
        );
        let (background, label) = match (background, label) {
            (Ok(background), Ok(label)) => (background, label),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("cannot build text box {:?}: {}", cx.id(), e);
                return;
            }
        };

        for id in [cx.id(), background] {
            if let Some(alignment) = cx.tree_mut().alignment_mut(id) {
                alignment.width = Align::mirror_width(label);
                alignment.height = Align::mirror_height(label);
            }
        }
        self.text_id = Some(label);
        self.background_id = Some(background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontFace, FontMetrics};
    use firecrest_core::{Rect, Vec2};
    use std::rc::Rc;

    fn font() -> Rc<dyn FontMetrics> {
        Rc::new(FontFace::monospace(10.0, 10.0))
    }

    fn text_box(tree: &mut ElementTree, alignment: ElementAlignment, text: &str) -> ElementId {
        let root = tree.root();
        tree.create_child(root, alignment, TextBox::new(Text::new(font(), 10.0).with_text(text), Color::BLACK))
            .unwrap()
    }

    #[test]
    fn test_box_fits_short_text() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let id = text_box(&mut tree, ElementAlignment::default().with_x(5.0).with_y(5.0), "hello");
        let background = tree.get::<TextBox>(id).unwrap().background_id().unwrap();

        // 5 chars * 10px wide, one 10px line plus 2px descender.
        assert_eq!(tree.pixel_rect(id), Rect::new(5.0, 5.0, 50.0, 12.0));
        assert_eq!(tree.pixel_rect(background), Rect::new(5.0, 5.0, 50.0, 12.0));
    }

    #[test]
    fn test_requested_width_bounds_wrapping() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let id = text_box(&mut tree, ElementAlignment::default().with_width(Align::relative(0.2)), "AAAA AAAA");
        let label = tree.get::<TextBox>(id).unwrap().text_id().unwrap();

        assert_eq!(tree.get::<Text>(label).unwrap().local_lines().len(), 2);
        assert_eq!(tree.pixel_size(id), Vec2::new(40.0, 22.0));
    }

    #[test]
    fn test_set_text_refits() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let id = text_box(&mut tree, ElementAlignment::default(), "hi");

        tree.with_element::<TextBox, _>(id, |b, cx| b.set_text(cx, "hello world"));
        assert_eq!(tree.pixel_size(id).x, 110.0);

        let tree_ref = &tree;
        assert_eq!(tree_ref.get::<TextBox>(id).unwrap().text(tree_ref), Some("hello world"));
    }

    #[test]
    fn test_set_background() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let id = text_box(&mut tree, ElementAlignment::default(), "hi");

        tree.with_element::<TextBox, _>(id, |b, cx| b.set_background(cx, Color::BLUE));
        let background = tree.get::<TextBox>(id).unwrap().background_id().unwrap();
        assert_eq!(tree.get::<ColoredRect>(background).unwrap().color, Color::BLUE);
    }
}
