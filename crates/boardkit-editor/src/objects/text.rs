//! Text objects: styled content, layout and in-place editing.
//!
//! Positions inside the content (cursor, selection, style runs) are char
//! indices, not byte offsets.

use super::measure::{LineMetrics, MonospaceMeasurer, TextMeasurer};
use crate::input::KeyEvent;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::FontSpec;
use boardkit_core::{Bounds, Rgba, Shared};
use boardkit_settings::TextDefaults;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Space between the text and its selection box, in local units.
pub const TEXT_PADDING: f64 = 20.0;

/// Caret blink period while editing.
pub const CARET_BLINK_MS: f64 = 530.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub color: String,
    pub size: f64,
    pub weight: FontWeight,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Geist Mono".to_string(),
            color: "#ffffff".to_string(),
            size: 20.0,
            weight: FontWeight::Normal,
            italic: false,
        }
    }
}

impl From<&TextDefaults> for TextStyle {
    fn from(defaults: &TextDefaults) -> Self {
        Self {
            font: defaults.font.clone(),
            color: defaults.color.clone(),
            size: defaults.size,
            weight: if defaults.bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            },
            italic: defaults.italic,
        }
    }
}

impl TextStyle {
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self.font.clone(),
            size: self.size,
            bold: self.weight == FontWeight::Bold,
            italic: self.italic,
        }
    }

    pub fn rgba(&self) -> Rgba {
        Rgba::from_hex(&self.color).unwrap_or(Rgba::opaque(255, 255, 255))
    }

    /// Copy of this style with every field set in `patch` replaced.
    pub fn apply(&self, patch: &TextStylePatch) -> TextStyle {
        TextStyle {
            font: patch.font.clone().unwrap_or_else(|| self.font.clone()),
            color: patch.color.clone().unwrap_or_else(|| self.color.clone()),
            size: patch.size.unwrap_or(self.size),
            weight: patch.weight.unwrap_or(self.weight),
            italic: patch.italic.unwrap_or(self.italic),
        }
    }
}

/// Partial style update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
}

impl TextStylePatch {
    pub fn weight(weight: FontWeight) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn italic(italic: bool) -> Self {
        Self {
            italic: Some(italic),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn size(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.color.is_none()
            && self.size.is_none()
            && self.weight.is_none()
            && self.italic.is_none()
    }
}

/// Style override for the char range `start..end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRun {
    pub start: usize,
    pub end: usize,
    pub patch: TextStylePatch,
}

/// Content, base style and runs; what text edit commands capture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSnapshot {
    pub content: String,
    pub style: TextStyle,
    pub runs: Vec<StyleRun>,
}

#[derive(Debug)]
struct EditState {
    cursor: usize,
    anchor: Option<usize>,
    caret: Rc<Cell<bool>>,
    blink: Option<FrameHandle>,
}

/// A run of uniformly styled text inside one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub style: TextStyle,
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Char index of the first character.
    pub start: usize,
    pub len: usize,
    pub width: f64,
    pub segments: Vec<Segment>,
}

/// Laid-out text, centered on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LineLayout>,
    pub line_height: f64,
    pub width: f64,
    pub height: f64,
}

impl TextLayout {
    /// Top edge of line `index`.
    pub fn line_top(&self, index: usize) -> f64 {
        -self.height / 2.0 + index as f64 * self.line_height
    }

    /// Left edge of line `index`.
    pub fn line_left(&self, index: usize) -> f64 {
        self.lines
            .get(index)
            .map(|line| -line.width / 2.0)
            .unwrap_or(0.0)
    }

    /// Line index and column of a char index.
    pub fn locate(&self, index: usize) -> (usize, usize) {
        for (i, line) in self.lines.iter().enumerate() {
            if index <= line.start + line.len {
                return (i, index.saturating_sub(line.start));
            }
        }
        let last = self.lines.len().saturating_sub(1);
        (last, self.lines.get(last).map(|l| l.len).unwrap_or(0))
    }
}

pub struct TextData {
    content: String,
    style: TextStyle,
    runs: Vec<StyleRun>,
    edit: Option<EditState>,
    measurer: Rc<dyn TextMeasurer>,
}

impl fmt::Debug for TextData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextData")
            .field("content", &self.content)
            .field("style", &self.style)
            .field("runs", &self.runs)
            .field("editing", &self.edit.is_some())
            .finish()
    }
}

impl Clone for TextData {
    /// Clones content and style; edit state is not carried over.
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            style: self.style.clone(),
            runs: self.runs.clone(),
            edit: None,
            measurer: Rc::clone(&self.measurer),
        }
    }
}

fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl TextData {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
            runs: Vec::new(),
            edit: None,
            measurer: Rc::new(MonospaceMeasurer),
        }
    }

    pub fn with_measurer(mut self, measurer: Rc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Replace the content. Runs and cursor are clamped to the new length.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        let len = self.char_count();
        for run in &mut self.runs {
            run.start = run.start.min(len);
            run.end = run.end.min(len);
        }
        self.runs.retain(|r| r.start < r.end);
        if let Some(edit) = &mut self.edit {
            edit.cursor = edit.cursor.min(len);
            edit.anchor = edit.anchor.map(|a| a.min(len));
        }
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub fn apply_style(&mut self, patch: &TextStylePatch) {
        self.style = self.style.apply(patch);
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    pub fn snapshot(&self) -> TextSnapshot {
        TextSnapshot {
            content: self.content.clone(),
            style: self.style.clone(),
            runs: self.runs.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &TextSnapshot) {
        self.runs = snapshot.runs.clone();
        self.style = snapshot.style.clone();
        self.set_content(snapshot.content.clone());
    }

    /// Effective style of the character at `index`: base style with every
    /// covering run applied in insertion order.
    pub fn style_at(&self, index: usize) -> TextStyle {
        self.runs
            .iter()
            .filter(|run| run.start <= index && index < run.end)
            .fold(self.style.clone(), |style, run| style.apply(&run.patch))
    }

    /// Apply `patch` to the edit selection, or to the base style when there
    /// is no selection.
    pub fn set_style_for_selection(&mut self, patch: TextStylePatch) {
        match self.selection_range() {
            Some(range) => self.runs.push(StyleRun {
                start: range.start,
                end: range.end,
                patch,
            }),
            None => self.apply_style(&patch),
        }
    }

    fn style_at_cursor(&self) -> TextStyle {
        match self.selection_range() {
            Some(range) => self.style_at(range.start),
            None => self.style.clone(),
        }
    }

    pub fn toggle_bold(&mut self) {
        let weight = self.style_at_cursor().weight.toggled();
        self.set_style_for_selection(TextStylePatch::weight(weight));
    }

    pub fn toggle_italic(&mut self) {
        let italic = !self.style_at_cursor().italic;
        self.set_style_for_selection(TextStylePatch::italic(italic));
    }

    pub fn layout(&self) -> TextLayout {
        let base = self.style.font_spec();
        let line_height = self.measurer.line_height(&base);
        let mut lines = Vec::new();
        let mut start = 0;

        for line in self.content.split('\n') {
            let mut segments: Vec<Segment> = Vec::new();
            let mut x = 0.0;
            let mut current: Option<(String, TextStyle)> = None;

            for (i, c) in line.chars().enumerate() {
                let style = self.style_at(start + i);
                if let Some((text, _)) = current.as_mut().filter(|(_, s)| *s == style) {
                    text.push(c);
                    continue;
                }
                if let Some((text, s)) = current.take() {
                    x = self.push_segment(&mut segments, text, s, x);
                }
                current = Some((c.to_string(), style));
            }
            if let Some((text, s)) = current.take() {
                x = self.push_segment(&mut segments, text, s, x);
            }

            let len = line.chars().count();
            lines.push(LineLayout {
                start,
                len,
                width: x,
                segments,
            });
            start += len + 1;
        }

        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let LineMetrics { height: last, .. } = self.measurer.measure("", &base);
        let height = line_height * (lines.len().saturating_sub(1)) as f64 + last;

        TextLayout {
            lines,
            line_height,
            width,
            height,
        }
    }

    fn push_segment(&self, segments: &mut Vec<Segment>, text: String, style: TextStyle, x: f64) -> f64 {
        let width = self.measurer.measure(&text, &style.font_spec()).width;
        segments.push(Segment {
            text,
            style,
            x,
            width,
        });
        x + width
    }

    /// Horizontal offset of column `col` inside `line`, relative to the
    /// line's left edge.
    pub fn column_x(&self, line: &LineLayout, col: usize) -> f64 {
        let mut remaining = col;
        for seg in &line.segments {
            let n = seg.text.chars().count();
            if remaining <= n {
                let prefix: String = seg.text.chars().take(remaining).collect();
                return seg.x + self.measurer.measure(&prefix, &seg.style.font_spec()).width;
            }
            remaining -= n;
        }
        line.width
    }

    /// Local bounds: the laid-out text plus [`TEXT_PADDING`].
    pub fn bounds(&self) -> Bounds {
        let layout = self.layout();
        Bounds::centered(layout.width, layout.height).expand(TEXT_PADDING)
    }

    // Edit mode

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Enter edit mode with the cursor at the end. When a scheduler is given
    /// the caret blinks every [`CARET_BLINK_MS`].
    pub fn start_editing(&mut self, scheduler: Option<&Shared<FrameScheduler>>) {
        if self.edit.is_some() {
            return;
        }
        let caret = Rc::new(Cell::new(true));
        let blink = scheduler.map(|s| {
            let caret = Rc::clone(&caret);
            s.borrow_mut()
                .request_interval(CARET_BLINK_MS, move |_| caret.set(!caret.get()))
        });
        self.edit = Some(EditState {
            cursor: self.char_count(),
            anchor: None,
            caret,
            blink,
        });
        tracing::debug!("Started editing text ({} chars)", self.char_count());
    }

    pub fn stop_editing(&mut self, scheduler: Option<&Shared<FrameScheduler>>) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        if let (Some(handle), Some(s)) = (edit.blink, scheduler) {
            s.borrow_mut().cancel(handle);
        }
        tracing::debug!("Stopped editing text");
    }

    pub fn cursor(&self) -> Option<usize> {
        self.edit.as_ref().map(|e| e.cursor)
    }

    pub fn caret_visible(&self) -> bool {
        self.edit.as_ref().is_some_and(|e| e.caret.get())
    }

    /// Non-empty selection range, if any.
    pub fn selection_range(&self) -> Option<Range<usize>> {
        let edit = self.edit.as_ref()?;
        let anchor = edit.anchor?;
        let range = anchor.min(edit.cursor)..anchor.max(edit.cursor);
        (!range.is_empty()).then_some(range)
    }

    pub fn set_selection(&mut self, anchor: usize, cursor: usize) {
        let len = self.char_count();
        if let Some(edit) = &mut self.edit {
            edit.anchor = Some(anchor.min(len));
            edit.cursor = cursor.min(len);
        }
    }

    pub fn select_all(&mut self) {
        let len = self.char_count();
        self.set_selection(0, len);
    }

    /// Handle a key while editing. Returns true if the key was consumed.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> bool {
        if self.edit.is_none() {
            return false;
        }
        let shift = event.modifiers.shift;

        if event.modifiers.command() {
            if event.key.eq_ignore_ascii_case("a") {
                self.select_all();
                return true;
            }
            return false;
        }

        let handled = match event.key.as_str() {
            "Backspace" => {
                if !self.delete_selection() {
                    if let Some(c) = self.cursor().filter(|c| *c > 0) {
                        self.delete_range(c - 1..c);
                    }
                }
                true
            }
            "Delete" => {
                if !self.delete_selection() {
                    if let Some(c) = self.cursor().filter(|c| *c < self.char_count()) {
                        self.delete_range(c..c + 1);
                    }
                }
                true
            }
            "Enter" => {
                self.insert_str("\n");
                true
            }
            "ArrowLeft" => {
                self.move_cursor(|this, c| match this.selection_range() {
                    Some(r) if !shift => r.start,
                    _ => c.saturating_sub(1),
                }, shift);
                true
            }
            "ArrowRight" => {
                let len = self.char_count();
                self.move_cursor(|this, c| match this.selection_range() {
                    Some(r) if !shift => r.end,
                    _ => (c + 1).min(len),
                }, shift);
                true
            }
            "Home" => {
                self.move_cursor(|this, c| {
                    let layout = this.layout();
                    let (line, _) = layout.locate(c);
                    layout.lines.get(line).map(|l| l.start).unwrap_or(0)
                }, shift);
                true
            }
            "End" => {
                self.move_cursor(|this, c| {
                    let layout = this.layout();
                    let (line, _) = layout.locate(c);
                    layout.lines.get(line).map(|l| l.start + l.len).unwrap_or(c)
                }, shift);
                true
            }
            _ => match event.printable() {
                Some(c) => {
                    self.insert_str(c.encode_utf8(&mut [0u8; 4]));
                    true
                }
                None => false,
            },
        };

        if handled {
            if let Some(edit) = &self.edit {
                edit.caret.set(true);
            }
        }
        handled
    }

    fn move_cursor(&mut self, target: impl Fn(&Self, usize) -> usize, extend: bool) {
        let Some(cursor) = self.cursor() else {
            return;
        };
        let next = target(self, cursor);
        if let Some(edit) = &mut self.edit {
            if extend {
                edit.anchor = Some(edit.anchor.unwrap_or(cursor));
            } else {
                edit.anchor = None;
            }
            edit.cursor = next;
        }
    }

    /// Insert at the cursor, replacing the selection.
    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let Some(at) = self.cursor() else {
            return;
        };
        let n = text.chars().count();
        let offset = byte_offset(&self.content, at);
        self.content.insert_str(offset, text);

        for run in &mut self.runs {
            if run.start >= at {
                run.start += n;
                run.end += n;
            } else if at < run.end {
                run.end += n;
            }
        }
        if let Some(edit) = &mut self.edit {
            edit.cursor = at + n;
            edit.anchor = None;
        }
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection_range() {
            Some(range) => {
                self.delete_range(range);
                true
            }
            None => false,
        }
    }

    fn delete_range(&mut self, range: Range<usize>) {
        let (a, b) = (range.start, range.end);
        let start = byte_offset(&self.content, a);
        let end = byte_offset(&self.content, b);
        self.content.replace_range(start..end, "");

        let removed = b - a;
        let shrink = |x: usize| {
            if x <= a {
                x
            } else if x >= b {
                x - removed
            } else {
                a
            }
        };
        for run in &mut self.runs {
            run.start = shrink(run.start);
            run.end = shrink(run.end);
        }
        self.runs.retain(|r| r.start < r.end);

        if let Some(edit) = &mut self.edit {
            edit.cursor = a;
            edit.anchor = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(content: &str) -> TextData {
        let mut t = TextData::new(content, TextStyle::default());
        t.start_editing(None);
        t
    }

    #[test]
    fn test_bounds_include_padding() {
        let t = TextData::new("abcd", TextStyle::default());
        let b = t.bounds();
        // 4 chars * 12 = 48 wide, 20 high, plus 20 padding on every side.
        assert!((b.width() - 88.0).abs() < 1e-9);
        assert!((b.height() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiline_layout() {
        let t = TextData::new("ab\nabcd", TextStyle::default());
        let layout = t.layout();
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.lines[1].start, 3);
        assert!((layout.width - 48.0).abs() < 1e-9);
        assert!((layout.height - 44.0).abs() < 1e-9);
        assert_eq!(layout.locate(4), (1, 1));
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut t = editing("hi");
        assert!(t.on_key_down(&KeyEvent::new("!")));
        assert_eq!(t.content(), "hi!");
        assert!(t.on_key_down(&KeyEvent::new("ArrowLeft")));
        assert!(t.on_key_down(&KeyEvent::new("Backspace")));
        assert_eq!(t.content(), "h!");
        assert_eq!(t.cursor(), Some(1));
        assert!(t.on_key_down(&KeyEvent::new("Enter")));
        assert_eq!(t.content(), "h\n!");
    }

    #[test]
    fn test_shift_selection_and_replace() {
        let mut t = editing("hello");
        t.on_key_down(&KeyEvent::new("ArrowLeft").shift());
        t.on_key_down(&KeyEvent::new("ArrowLeft").shift());
        assert_eq!(t.selection_range(), Some(3..5));
        t.on_key_down(&KeyEvent::new("p"));
        assert_eq!(t.content(), "help");
    }

    #[test]
    fn test_select_all_and_delete() {
        let mut t = editing("gone");
        assert!(t.on_key_down(&KeyEvent::new("a").ctrl()));
        assert!(t.on_key_down(&KeyEvent::new("Delete")));
        assert_eq!(t.content(), "");
    }

    #[test]
    fn test_style_runs_follow_edits() {
        let mut t = editing("abcdef");
        t.set_selection(2, 4);
        t.toggle_bold();
        assert_eq!(t.style_at(2).weight, FontWeight::Bold);
        assert_eq!(t.style_at(4).weight, FontWeight::Normal);

        t.set_selection(0, 0);
        if let Some(edit) = &mut t.edit {
            edit.cursor = 0;
            edit.anchor = None;
        }
        t.insert_str("xy");
        assert_eq!(t.runs()[0].start, 4);
        assert_eq!(t.runs()[0].end, 6);

        t.set_selection(3, 5);
        t.on_key_down(&KeyEvent::new("Backspace"));
        assert_eq!(t.runs()[0].start, 3);
        assert_eq!(t.runs()[0].end, 4);
    }

    #[test]
    fn test_toggle_without_selection_changes_base_style() {
        let mut t = TextData::new("abc", TextStyle::default());
        t.toggle_italic();
        assert!(t.style().italic);
        assert!(t.runs().is_empty());
    }

    #[test]
    fn test_keys_ignored_when_not_editing() {
        let mut t = TextData::new("abc", TextStyle::default());
        assert!(!t.on_key_down(&KeyEvent::new("x")));
        assert_eq!(t.content(), "abc");
    }

    #[test]
    fn test_home_end_on_second_line() {
        let mut t = editing("ab\ncd");
        t.on_key_down(&KeyEvent::new("Home"));
        assert_eq!(t.cursor(), Some(3));
        t.on_key_down(&KeyEvent::new("End").shift());
        assert_eq!(t.selection_range(), Some(3..5));
    }
}
