//! UI rendering system.
//!
//! Elements record backend-neutral commands into a [`UIRenderer`]; the
//! graphics backend consumes the resulting [`UIBatch`]es. A new batch starts
//! at every clip change so each batch maps to one scissor state.

use firecrest_core::{Color, Rect, Vec2};
use std::time::Duration;

/// One drawing instruction produced by an element.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
        /// Corner radius.
        corner_radius: f32,
    },
    /// One line of text.
    Text {
        /// Text content.
        text: String,
        /// Left end of the baseline.
        position: Vec2,
        /// Nominal font size.
        font_size: f32,
        /// Text color.
        color: Color,
    },
    /// A single segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// A connected polyline.
    LineStrip {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// Restricts later commands to `bounds` until the matching pop.
    PushClip {
        /// Clip bounds, already intersected with the enclosing clip.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// A run of commands sharing one clip state.
#[derive(Debug, Clone, Default)]
pub struct UIBatch {
    /// Commands drawn under this batch's clip.
    pub commands: Vec<RenderCommand>,
    /// Clip rect (if any).
    pub clip: Option<Rect>,
}

impl UIBatch {
    /// Creates a new empty batch.
    #[must_use]
    pub fn new(clip: Option<Rect>) -> Self {
        Self {
            commands: Vec::with_capacity(256),
            clip,
        }
    }

    /// Tessellates the filled rectangles of this batch into two triangles
    /// each. Corner radii are left to the shader.
    #[must_use]
    pub fn rect_vertices(&self) -> Vec<UIVertex> {
        let mut vertices = Vec::new();
        for command in &self.commands {
            if let RenderCommand::Rect { bounds, color, .. } = command {
                let packed = color.pack_rgba();
                let (l, b, r, t) = (bounds.x, bounds.y, bounds.right(), bounds.top());
                vertices.extend_from_slice(&[
                    UIVertex::new(l, b, packed),
                    UIVertex::new(r, b, packed),
                    UIVertex::new(r, t, packed),
                    UIVertex::new(l, b, packed),
                    UIVertex::new(r, t, packed),
                    UIVertex::new(l, t, packed),
                ]);
            }
        }
        vertices
    }
}

/// Collects the commands of one frame and groups them by clip.
pub struct UIRenderer {
    /// Every command recorded since `begin_frame`.
    commands: Vec<RenderCommand>,
    /// Clip stack.
    clip_stack: Vec<Rect>,
    /// Batches built by the last `end_frame`.
    batches: Vec<UIBatch>,
}

impl UIRenderer {
    /// Creates an empty command buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(4096),
            clip_stack: Vec::with_capacity(16),
            batches: Vec::with_capacity(64),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.batches.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Appends several commands in order.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = RenderCommand>) {
        self.commands.extend(commands);
    }

    /// Pushes a clip rect.
    pub fn push_clip(&mut self, bounds: Rect) {
        // Nested clips never grow past their parent.
        let actual_clip = if let Some(current) = self.clip_stack.last() {
            current.intersection(&bounds).unwrap_or(Rect::ZERO)
        } else {
            bounds
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip { bounds: actual_clip });
    }

    /// Restores the clip that was active before the last `push_clip`.
    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
        self.commands.push(RenderCommand::PopClip);
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Splits the recorded commands into per-clip batches.
    pub fn end_frame(&mut self) -> &[UIBatch] {
        self.batches.clear();
        let mut clips: Vec<Rect> = Vec::new();
        let mut batch = UIBatch::new(None);

        for command in std::mem::take(&mut self.commands) {
            match command {
                RenderCommand::PushClip { bounds } => {
                    clips.push(bounds);
                    self.flush_batch(&mut batch, Some(bounds));
                }
                RenderCommand::PopClip => {
                    clips.pop();
                    self.flush_batch(&mut batch, clips.last().copied());
                }
                other => batch.commands.push(other),
            }
        }
        if !batch.commands.is_empty() {
            self.batches.push(batch);
        }

        &self.batches
    }

    fn flush_batch(&mut self, batch: &mut UIBatch, next_clip: Option<Rect>) {
        let finished = std::mem::replace(batch, UIBatch::new(next_clip));
        if !finished.commands.is_empty() {
            self.batches.push(finished);
        }
    }

    /// Number of commands recorded this frame.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Commands recorded so far this frame.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A tessellated fill vertex: y-up position and packed RGBA.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UIVertex {
    /// Position (x, y).
    pub position: [f32; 2],
    /// Packed `0xRRGGBBAA` color.
    pub color: u32,
}

impl UIVertex {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, color: u32) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Casts vertices to raw bytes for upload.
#[must_use]
pub fn vertex_bytes(vertices: &[UIVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Per-frame drawing state handed to [`Element::render`](crate::element::Element::render).
pub struct Frame<'a> {
    /// Command sink.
    pub renderer: &'a mut UIRenderer,
    /// Time since the previous frame.
    pub delta: Duration,
}

impl<'a> Frame<'a> {
    /// Wraps a renderer for one frame.
    #[must_use]
    pub fn new(renderer: &'a mut UIRenderer, delta: Duration) -> Self {
        Self { renderer, delta }
    }

    /// Records a command.
    #[inline]
    pub fn push(&mut self, command: RenderCommand) {
        self.renderer.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(x: f32) -> RenderCommand {
        RenderCommand::Rect {
            bounds: Rect::new(x, 0.0, 10.0, 10.0),
            color: Color::WHITE,
            corner_radius: 0.0,
        }
    }

    #[test]
    fn test_renderer_frame() {
        let mut renderer = UIRenderer::new();

        renderer.begin_frame();
        renderer.push(RenderCommand::Rect {
            bounds: Rect::new(0.0, 0.0, 100.0, 50.0),
            color: Color::WHITE,
            corner_radius: 0.0,
        });

        let batches = renderer.end_frame();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].commands.len(), 1);
    }

    #[test]
    fn test_clip_stack() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        renderer.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(renderer.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        // Disjoint from the enclosing clip.
        renderer.push_clip(Rect::new(500.0, 500.0, 10.0, 10.0));
        assert_eq!(renderer.current_clip(), Some(Rect::ZERO));

        renderer.pop_clip();
        renderer.pop_clip();
        renderer.pop_clip();
        assert!(renderer.current_clip().is_none());
    }

    #[test]
    fn test_batches_split_at_clip_changes() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push(fill(0.0));
        renderer.push_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
        renderer.push(fill(1.0));
        renderer.push(fill(2.0));
        renderer.pop_clip();
        renderer.push(fill(3.0));

        let batches = renderer.end_frame();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].clip, None);
        assert_eq!(batches[1].clip, Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(batches[1].commands.len(), 2);
        assert_eq!(batches[2].clip, None);
    }

    #[test]
    fn test_rect_vertices() {
        let mut batch = UIBatch::new(None);
        batch.commands.push(fill(0.0));
        batch.commands.push(RenderCommand::PopClip);

        let vertices = batch.rect_vertices();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[2].position, [10.0, 10.0]);
        assert_eq!(vertices[0].color, 0xFFFF_FFFF);
        assert_eq!(vertex_bytes(&vertices).len(), 6 * std::mem::size_of::<UIVertex>());
    }
}
