//! Host page abstraction.
//!
//! The pipeline never touches a document directly. It measures elements,
//! sizes and paints the canvas, and replaces the container's content; a
//! long-lived host can also put the canvas back after a diagnostic took its
//! place. [`StaticPage`] implements these in memory and can export the result
//! as an HTML document.

use serde::Serialize;

/// Element bounding box in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// What the pipeline needs from the page hosting the chart.
///
/// Methods addressing an element return `None`/`false` when the element is
/// absent, never panic.
pub trait HostPage {
    /// Bounding box of an element
    fn element_rect(&self, id: &str) -> Option<Rect>;

    /// Set the pixel size of a canvas element
    fn set_canvas_size(&mut self, id: &str, width: u32, height: u32) -> bool;

    /// Replace the drawing shown by a canvas element
    fn paint_canvas(&mut self, id: &str, drawing: &str) -> bool;

    /// Replace all content of an element with markup
    fn replace_content(&mut self, id: &str, html: &str) -> bool;

    /// Put an empty canvas `canvas_id` back into `container_id` if its
    /// content was replaced. Returns true when a canvas was restored.
    fn restore_canvas(&mut self, container_id: &str, canvas_id: &str) -> bool;
}

/// Canvas element state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasElement {
    pub width: u32,
    pub height: u32,
    pub drawing: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
enum ContainerContent {
    Canvas(CanvasElement),
    Markup(String),
}

#[derive(Clone, Debug, PartialEq)]
struct ContainerElement {
    rect: Rect,
    content: ContainerContent,
}

/// In-memory page with one container holding one canvas.
///
/// Like a document, replacing the container's content removes the canvas.
#[derive(Clone, Debug)]
pub struct StaticPage {
    container_id: String,
    canvas_id: String,
    container: Option<ContainerElement>,
}

impl StaticPage {
    /// Page whose container fills a `width` x `height` viewport.
    pub fn new(container_id: &str, canvas_id: &str, width: f32, height: f32) -> Self {
        Self {
            container_id: container_id.to_string(),
            canvas_id: canvas_id.to_string(),
            container: Some(ContainerElement {
                rect: Rect::sized(width, height),
                content: ContainerContent::Canvas(CanvasElement::default()),
            }),
        }
    }

    /// Page with no container element at all.
    pub fn without_container(container_id: &str, canvas_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            canvas_id: canvas_id.to_string(),
            container: None,
        }
    }

    /// Remove the canvas, keeping the container.
    pub fn remove_canvas(&mut self) {
        if let Some(container) = self.container.as_mut() {
            container.content = ContainerContent::Markup(String::new());
        }
    }

    /// Resize the container, as the surrounding layout would on a viewport change.
    pub fn resize_container(&mut self, width: f32, height: f32) {
        if let Some(container) = self.container.as_mut() {
            container.rect.width = width.max(0.0);
            container.rect.height = height.max(0.0);
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn canvas(&self) -> Option<&CanvasElement> {
        match &self.container.as_ref()?.content {
            ContainerContent::Canvas(canvas) => Some(canvas),
            ContainerContent::Markup(_) => None,
        }
    }

    fn canvas_mut(&mut self, id: &str) -> Option<&mut CanvasElement> {
        if id != self.canvas_id {
            return None;
        }
        match &mut self.container.as_mut()?.content {
            ContainerContent::Canvas(canvas) => Some(canvas),
            ContainerContent::Markup(_) => None,
        }
    }

    /// Markup the container was last filled with, if its canvas was replaced.
    pub fn container_markup(&self) -> Option<&str> {
        match &self.container.as_ref()?.content {
            ContainerContent::Markup(html) => Some(html),
            ContainerContent::Canvas(_) => None,
        }
    }

    /// Serialize the page as a standalone HTML document.
    pub fn to_html(&self, title: &str) -> String {
        let body = match &self.container {
            None => String::new(),
            Some(container) => {
                let inner = match &container.content {
                    ContainerContent::Markup(html) => html.clone(),
                    ContainerContent::Canvas(canvas) => format!(
                        "<div id=\"{}\" class=\"chart-canvas\" style=\"width: {}px; height: {}px;\">{}</div>",
                        escape_html(&self.canvas_id),
                        canvas.width,
                        canvas.height,
                        canvas.drawing.as_deref().unwrap_or_default()
                    ),
                };
                format!(
                    "<div id=\"{}\" class=\"chart-container\" style=\"width: {}px; height: {}px; padding: {}px; box-sizing: border-box;\">\n{}\n</div>",
                    escape_html(&self.container_id),
                    container.rect.width,
                    container.rect.height,
                    crate::constants::CONTAINER_PADDING / 2.0,
                    inner
                )
            }
        };

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{}</title>\n\
<style>body {{ margin: 0; font-family: sans-serif; }} .chart-error {{ padding: 2rem; text-align: center; }}</style>\n\
</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(title),
            body
        )
    }
}

impl HostPage for StaticPage {
    fn element_rect(&self, id: &str) -> Option<Rect> {
        let container = self.container.as_ref()?;
        if id == self.container_id {
            return Some(container.rect);
        }
        if id == self.canvas_id {
            if let ContainerContent::Canvas(canvas) = &container.content {
                return Some(Rect::new(
                    container.rect.x,
                    container.rect.y,
                    canvas.width as f32,
                    canvas.height as f32,
                ));
            }
        }
        None
    }

    fn set_canvas_size(&mut self, id: &str, width: u32, height: u32) -> bool {
        match self.canvas_mut(id) {
            Some(canvas) => {
                canvas.width = width;
                canvas.height = height;
                true
            }
            None => false,
        }
    }

    fn paint_canvas(&mut self, id: &str, drawing: &str) -> bool {
        match self.canvas_mut(id) {
            Some(canvas) => {
                canvas.drawing = Some(drawing.to_string());
                true
            }
            None => false,
        }
    }

    fn replace_content(&mut self, id: &str, html: &str) -> bool {
        if id != self.container_id {
            return false;
        }
        match self.container.as_mut() {
            Some(container) => {
                container.content = ContainerContent::Markup(html.to_string());
                true
            }
            None => false,
        }
    }

    fn restore_canvas(&mut self, container_id: &str, canvas_id: &str) -> bool {
        if container_id != self.container_id || canvas_id != self.canvas_id {
            return false;
        }
        match self.container.as_mut() {
            Some(container) if matches!(container.content, ContainerContent::Markup(_)) => {
                container.content = ContainerContent::Canvas(CanvasElement::default());
                true
            }
            _ => false,
        }
    }
}

/// Escape text for inclusion in HTML or SVG markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
