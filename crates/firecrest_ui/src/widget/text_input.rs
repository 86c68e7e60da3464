//! Multi-line editable text.
//!
//! The caret is a char index into the content, clamped to `0..=len` after
//! every edit. Vertical movement and Home/End work on the wrapped lines the
//! text element has cached, so they follow what is on screen rather than
//! the raw newlines.

use crate::alignment::ElementAlignment;
use crate::config::{TextInputConfig, UiConfig};
use crate::element::{Element, ElementContext, ElementId};
use crate::events::{KeyboardEvent, ScrollEvent};
use crate::input::{Input, Key};
use crate::layout::{Layout, ScrollState, StackLayout, VerticalDirection};
use crate::render::{Frame, RenderCommand};
use crate::text::{FontMetrics, Text, TextLine};
use crate::tree::ElementTree;
use firecrest_core::{Color, Rect};
use std::rc::Rc;

/// A focusable, scrolling text editor.
pub struct TextInput {
    pending: Option<Text>,
    text_id: Option<ElementId>,
    scroll: ScrollState,
    config: TextInputConfig,
    background: Color,
    cursor: usize,
    blink: u32,
    focused: bool,
}

impl TextInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new(font: Rc<dyn FontMetrics>, size: f32, config: &UiConfig) -> Self {
        Self {
            pending: Some(Text::new(font, size).wrap_tightly(true)),
            text_id: None,
            scroll: ScrollState::new(config.scroll.clone()),
            config: config.text_input.clone(),
            background: Color::rgb(0.12, 0.12, 0.14),
            cursor: 0,
            blink: 0,
            focused: false,
        }
    }

    /// Sets the initial content; the caret starts at its end.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.cursor = text.chars().count();
        self.pending = self.pending.map(|t| t.with_text(text));
        self
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.pending = self.pending.map(|t| t.with_color(color));
        self
    }

    /// Sets the fill behind the text.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// The text child.
    #[must_use]
    pub fn text_id(&self) -> Option<ElementId> {
        self.text_id
    }

    /// Current content.
    #[must_use]
    pub fn value<'t>(&self, tree: &'t ElementTree) -> &'t str {
        self.text_id
            .and_then(|id| tree.get::<Text>(id))
            .map_or("", Text::text)
    }

    /// Caret position as a char index.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Scroll bookkeeping.
    #[must_use]
    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    /// Replaces the content and moves the caret to its end.
    pub fn set_text(&mut self, cx: &mut ElementContext<'_>, text: impl Into<String>) {
        let text = text.into();
        self.cursor = text.chars().count();
        self.edit(cx, |s| *s = text);
    }

    fn char_count(&self, tree: &ElementTree) -> usize {
        self.value(tree).chars().count()
    }

    fn edit(&mut self, cx: &mut ElementContext<'_>, f: impl FnOnce(&mut String)) {
        if let Some(id) = self.text_id {
            cx.tree_mut().with_element::<Text, _>(id, |t, cx| t.update_text(cx, f));
        }
    }

    fn insert(&mut self, cx: &mut ElementContext<'_>, insertion: &str) {
        let at = self.cursor;
        self.edit(cx, |s| {
            let index = byte_index(s, at);
            s.insert_str(index, insertion);
        });
        self.cursor += insertion.chars().count();
    }

    fn remove(&mut self, cx: &mut ElementContext<'_>, at: usize) {
        self.edit(cx, |s| {
            let index = byte_index(s, at);
            if index < s.len() {
                s.remove(index);
            }
        });
    }

    /// Cached lines, refreshed against the current width first.
    fn lines(&self, cx: &mut ElementContext<'_>) -> Vec<TextLine> {
        let Some(id) = self.text_id else {
            return Vec::new();
        };
        let tree = cx.tree_mut();
        tree.with_element::<Text, _>(id, |t, cx| t.refresh(cx));
        tree.get::<Text>(id)
            .map(|t| t.local_lines().to_vec())
            .unwrap_or_default()
    }

    fn move_vertically(&mut self, cx: &mut ElementContext<'_>, down: bool) {
        let lines = self.lines(cx);
        let current = line_of(&lines, self.cursor);
        let column = lines
            .get(current)
            .map_or(0, |line| self.cursor.saturating_sub(line.start));

        let target = if down { current.checked_add(1) } else { current.checked_sub(1) };
        match target.and_then(|index| lines.get(index)) {
            Some(line) => self.cursor = line.start + column.min(line.text.chars().count()),
            None if down => self.cursor = self.char_count(cx.tree()),
            None => self.cursor = 0,
        }
    }

    fn move_within_line(&mut self, cx: &mut ElementContext<'_>, to_end: bool) {
        let lines = self.lines(cx);
        if let Some(line) = lines.get(line_of(&lines, self.cursor)) {
            self.cursor = if to_end { line.start + line.text.chars().count() } else { line.start };
        }
    }

    /// Caret rectangle in window coordinates.
    fn cursor_rect(&self, tree: &ElementTree) -> Option<Rect> {
        let id = self.text_id?;
        let text = tree.get::<Text>(id)?;
        let lines = text.local_lines();
        let line = lines.get(line_of(lines, self.cursor))?;

        let column = self.cursor.saturating_sub(line.start).min(line.text.chars().count());
        let prefix: String = line.text.chars().take(column).collect();
        let font = text.font();
        let size = text.size();
        let rect = tree.pixel_rect(id);
        let baseline = rect.top() + line.offset.y;

        Some(Rect::new(
            rect.x + font.advance(&prefix, size),
            baseline + font.descender(size),
            self.config.cursor_width,
            font.line_height(size),
        ))
    }

    fn cursor_visible(&self) -> bool {
        let interval = self.config.blink_interval.max(1);
        self.focused && self.blink % interval < interval / 2
    }
}

/// Index of the line holding char `cursor`.
fn line_of(lines: &[TextLine], cursor: usize) -> usize {
    lines.iter().rposition(|line| line.start <= cursor).unwrap_or(0)
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(index, _)| index)
}

/// Start of the word before `from`: whitespace, then the word itself.
fn word_start(chars: &[char], from: usize) -> usize {
    let mut at = from.min(chars.len());
    while at > 0 && chars[at - 1].is_whitespace() {
        at -= 1;
    }
    while at > 0 && !chars[at - 1].is_whitespace() {
        at -= 1;
    }
    at
}

/// Start of the word after `from`: the current word, then whitespace.
fn word_end(chars: &[char], from: usize) -> usize {
    let mut at = from.min(chars.len());
    while at < chars.len() && !chars[at].is_whitespace() {
        at += 1;
    }
    while at < chars.len() && chars[at].is_whitespace() {
        at += 1;
    }
    at
}

impl Element for TextInput {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(StackLayout::vertical(VerticalDirection::TopToBottom, 0.0)))
    }

    fn created(&mut self, cx: &mut ElementContext<'_>) {
        cx.set_focusable(true);
        self.scroll.attach(cx);
        if let Some(text) = self.pending.take() {
            match cx.create_child(ElementAlignment::default(), text) {
                Ok(id) => self.text_id = Some(id),
                Err(e) => tracing::warn!("cannot build text input {:?}: {}", cx.id(), e),
            }
        }
        self.cursor = self.cursor.min(self.char_count(cx.tree()));
    }

    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        if self.scroll.is_sticking_to_bottom() {
            self.scroll.go_to_bottom(cx);
        }

        let rect = cx.pixel_rect();
        frame.push(RenderCommand::Rect { bounds: rect, color: self.background, corner_radius: 0.0 });
        frame.renderer.push_clip(rect);
        cx.render_children(frame);

        if self.cursor_visible() {
            if let Some(bounds) = self.cursor_rect(cx.tree()) {
                frame.push(RenderCommand::Rect {
                    bounds,
                    color: self.config.cursor_color,
                    corner_radius: 0.0,
                });
            }
        }
        if self.scroll.config().clamp {
            self.scroll.render_scrollbar(cx, frame);
        }
        frame.renderer.pop_clip();

        self.blink = self.blink.wrapping_add(1);
    }

    fn on_scroll(&mut self, cx: &mut ElementContext<'_>, _input: &Input, event: ScrollEvent) {
        self.scroll.scroll(cx, event.offset.y);
    }

    fn on_char(&mut self, cx: &mut ElementContext<'_>, _input: &Input, ch: char) {
        if ch.is_control() {
            return;
        }
        self.blink = 0;
        self.insert(cx, ch.encode_utf8(&mut [0; 4]));
    }

    fn on_key(&mut self, cx: &mut ElementContext<'_>, input: &Input, event: KeyboardEvent) {
        if !event.is_press_or_repeat() {
            return;
        }
        self.blink = 0;

        let ctrl = event.mods.ctrl
            || input.key_held(Key::LeftControl)
            || input.key_held(Key::RightControl);
        let chars: Vec<char> = self.value(cx.tree()).chars().collect();

        match event.key {
            Key::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove(cx, self.cursor);
            }
            Key::Delete if self.cursor < chars.len() => self.remove(cx, self.cursor),
            Key::Enter => self.insert(cx, "\n"),
            Key::Left if ctrl => self.cursor = word_start(&chars, self.cursor),
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right if ctrl => self.cursor = word_end(&chars, self.cursor),
            Key::Right => self.cursor += 1,
            Key::Up => self.move_vertically(cx, false),
            Key::Down => self.move_vertically(cx, true),
            Key::Home => self.move_within_line(cx, false),
            Key::End => self.move_within_line(cx, true),
            Key::V if ctrl => {
                let clipboard = input.clipboard();
                self.insert(cx, &clipboard);
            }
            _ => {}
        }

        self.cursor = self.cursor.min(self.char_count(cx.tree()));
    }

    fn on_focus_acquired(&mut self, _cx: &mut ElementContext<'_>) {
        self.focused = true;
        self.blink = 0;
    }

    fn on_focus_lost(&mut self, _cx: &mut ElementContext<'_>) {
        self.focused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyAction;
    use crate::input::Modifiers;
    use crate::render::UIRenderer;
    use crate::text::FontFace;
    use firecrest_core::Vec2;
    use std::time::Duration;

    fn input_with(text: &str) -> (ElementTree, ElementId) {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let root = tree.root();
        let font: Rc<dyn FontMetrics> = Rc::new(FontFace::monospace(10.0, 10.0));
        let id = tree
            .create_child(
                root,
                ElementAlignment::fixed(0.0, 0.0, 100.0, 50.0),
                TextInput::new(font, 10.0, &UiConfig::default()).with_text(text),
            )
            .unwrap();
        (tree, id)
    }

    fn press(tree: &mut ElementTree, id: ElementId, key: Key) {
        tree.send_key(id, &Input::new(), KeyboardEvent::new(key, KeyAction::Press));
    }

    fn press_ctrl(tree: &mut ElementTree, id: ElementId, input: &Input, key: Key) {
        tree.send_key(id, input, KeyboardEvent::new(key, KeyAction::Press).with_mods(Modifiers::CTRL));
    }

    fn state(tree: &ElementTree, id: ElementId) -> (String, usize) {
        let input = tree.get::<TextInput>(id).unwrap();
        (input.value(tree).to_owned(), input.cursor())
    }

    fn cursor_rects(tree: &mut ElementTree, id: ElementId) -> Vec<Rect> {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();
        tree.render(id, &mut Frame::new(&mut renderer, Duration::ZERO));
        renderer
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Rect { bounds, .. } if bounds.width == 3.0 => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let (mut tree, id) = input_with("");
        assert!(tree.is_focusable(id));

        for ch in "helo".chars() {
            tree.send_char(id, &Input::new(), ch);
        }
        press(&mut tree, id, Key::Left);
        tree.send_char(id, &Input::new(), 'l');
        assert_eq!(state(&tree, id), ("hello".to_owned(), 4));

        tree.send_char(id, &Input::new(), '\u{8}');
        assert_eq!(state(&tree, id), ("hello".to_owned(), 4));
    }

    #[test]
    fn test_backspace_delete_and_enter() {
        let (mut tree, id) = input_with("hello");

        press(&mut tree, id, Key::Left);
        press(&mut tree, id, Key::Backspace);
        assert_eq!(state(&tree, id), ("helo".to_owned(), 3));

        press(&mut tree, id, Key::Delete);
        assert_eq!(state(&tree, id), ("hel".to_owned(), 3));
        press(&mut tree, id, Key::Delete);
        assert_eq!(state(&tree, id), ("hel".to_owned(), 3));

        press(&mut tree, id, Key::Enter);
        assert_eq!(state(&tree, id), ("hel\n".to_owned(), 4));

        press(&mut tree, id, Key::Home);
        for _ in 0..6 {
            press(&mut tree, id, Key::Left);
        }
        press(&mut tree, id, Key::Backspace);
        assert_eq!(state(&tree, id), ("hel\n".to_owned(), 0));
    }

    #[test]
    fn test_release_is_ignored() {
        let (mut tree, id) = input_with("abc");
        tree.send_key(id, &Input::new(), KeyboardEvent::new(Key::Backspace, KeyAction::Release));
        assert_eq!(state(&tree, id), ("abc".to_owned(), 3));

        tree.send_key(id, &Input::new(), KeyboardEvent::new(Key::Backspace, KeyAction::Repeat));
        assert_eq!(state(&tree, id), ("ab".to_owned(), 2));
    }

    #[test]
    fn test_cursor_clamps_at_edges() {
        let (mut tree, id) = input_with("ab");
        press(&mut tree, id, Key::Right);
        assert_eq!(state(&tree, id).1, 2);
        for _ in 0..4 {
            press(&mut tree, id, Key::Left);
        }
        assert_eq!(state(&tree, id).1, 0);
    }

    #[test]
    fn test_ctrl_jumps_by_word() {
        let (mut tree, id) = input_with("foo bar baz");
        let input = Input::new();

        press_ctrl(&mut tree, id, &input, Key::Left);
        assert_eq!(state(&tree, id).1, 8);
        press_ctrl(&mut tree, id, &input, Key::Left);
        assert_eq!(state(&tree, id).1, 4);
        press_ctrl(&mut tree, id, &input, Key::Right);
        assert_eq!(state(&tree, id).1, 8);
        press_ctrl(&mut tree, id, &input, Key::Right);
        assert_eq!(state(&tree, id).1, 11);
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let (mut tree, id) = input_with("abcdef\nxy");
        press(&mut tree, id, Key::Up);
        // Column 2 of "xy" maps to column 2 of "abcdef".
        assert_eq!(state(&tree, id).1, 2);

        for _ in 0..3 {
            press(&mut tree, id, Key::Right);
        }
        press(&mut tree, id, Key::Down);
        assert_eq!(state(&tree, id).1, 9);

        press(&mut tree, id, Key::Down);
        assert_eq!(state(&tree, id).1, 9);
        press(&mut tree, id, Key::Up);
        press(&mut tree, id, Key::Up);
        assert_eq!(state(&tree, id).1, 0);
    }

    #[test]
    fn test_vertical_movement_follows_wrapped_lines() {
        // 10 chars fit on a 100px line.
        let (mut tree, id) = input_with("abcdefghijklm");
        press(&mut tree, id, Key::Up);
        assert_eq!(state(&tree, id).1, 3);

        press(&mut tree, id, Key::Home);
        assert_eq!(state(&tree, id).1, 0);
        press(&mut tree, id, Key::End);
        assert_eq!(state(&tree, id).1, 10);
    }

    #[test]
    fn test_paste() {
        let (mut tree, id) = input_with("ad");
        let input = Input::new();
        input.set_clipboard("bc");

        press(&mut tree, id, Key::Left);
        press_ctrl(&mut tree, id, &input, Key::V);
        assert_eq!(state(&tree, id), ("abcd".to_owned(), 3));

        tree.send_key(id, &input, KeyboardEvent::new(Key::V, KeyAction::Press));
        assert_eq!(state(&tree, id).0, "abcd");
    }

    #[test]
    fn test_cursor_drawn_only_while_focused() {
        let (mut tree, id) = input_with("hi");
        assert!(cursor_rects(&mut tree, id).is_empty());

        assert!(tree.focus_on(id));
        // Baseline 10px below the top edge at 50, caret from the descender.
        assert_eq!(cursor_rects(&mut tree, id), vec![Rect::new(20.0, 38.0, 3.0, 10.0)]);

        tree.un_focus();
        assert!(cursor_rects(&mut tree, id).is_empty());
    }

    #[test]
    fn test_cursor_blinks() {
        let (mut tree, id) = input_with("hi");
        tree.focus_on(id);

        for _ in 0..30 {
            assert_eq!(cursor_rects(&mut tree, id).len(), 1);
        }
        assert!(cursor_rects(&mut tree, id).is_empty());

        press(&mut tree, id, Key::Left);
        assert_eq!(cursor_rects(&mut tree, id), vec![Rect::new(10.0, 38.0, 3.0, 10.0)]);
    }

    #[test]
    fn test_wheel_scrolls_long_content() {
        let (mut tree, id) = input_with("1\n2\n3\n4\n5\n6\n7\n8");
        tree.send_scroll(id, &Input::new(), ScrollEvent { offset: Vec2::new(0.0, -1.0) });

        // 8 lines plus descender is 82px in a 50px box.
        let scroll = tree.get::<TextInput>(id).unwrap().scroll_state();
        assert_eq!(scroll.offset(), -32.0);
        assert!(scroll.is_sticking_to_bottom());
    }
}
