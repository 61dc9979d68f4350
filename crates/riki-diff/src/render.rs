//! Rendering edit scripts as addition/subtraction markup.
//!
//! The renderer walks an [`EditScript`] with an explicit three-state machine:
//!
//! ```text
//!               Insert                    Delete
//!   InAddition <------- Neutral -------> InSubtraction
//!        |       close    ^    close          |
//!        +--- non-Insert -+-- non-Delete -----+
//! ```
//!
//! Switching directly between an addition and a subtraction closes the open
//! span before opening the other one. The end of the script always returns
//! the machine to `Neutral`, so no span is ever left open.

use serde::{Deserialize, Serialize};

use crate::script::{EditOp, EditScript};

/// Markers wrapped around addition and subtraction runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanStyle {
    pub addition_open: String,
    pub addition_close: String,
    pub subtraction_open: String,
    pub subtraction_close: String,
    /// HTML-escape every character of page content.
    pub escape_html: bool,
}

impl SpanStyle {
    /// `<span class="addition">` / `<span class="subtraction">` with escaped content.
    pub fn html() -> Self {
        Self {
            addition_open: r#"<span class="addition">"#.into(),
            addition_close: "</span>".into(),
            subtraction_open: r#"<span class="subtraction">"#.into(),
            subtraction_close: "</span>".into(),
            escape_html: true,
        }
    }

    /// `{+added+}` / `[-removed-]` markers, content emitted verbatim.
    pub fn plain() -> Self {
        Self {
            addition_open: "{+".into(),
            addition_close: "+}".into(),
            subtraction_open: "[-".into(),
            subtraction_close: "-]".into(),
            escape_html: false,
        }
    }
}

impl Default for SpanStyle {
    fn default() -> Self {
        Self::html()
    }
}

/// Marked-up text produced by [`ChangeRenderer::render`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedChange {
    pub markup: String,
    /// Number of addition spans in `markup`.
    pub additions: usize,
    /// Number of subtraction spans in `markup`.
    pub subtractions: usize,
}

impl RenderedChange {
    /// Returns `true` if nothing is highlighted.
    pub fn is_unchanged(&self) -> bool {
        self.additions == 0 && self.subtractions == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RenderState {
    Neutral,
    InAddition,
    InSubtraction,
}

impl RenderState {
    fn for_op(op: &EditOp) -> Self {
        match op {
            EditOp::Keep(_) => Self::Neutral,
            EditOp::Insert(_) => Self::InAddition,
            EditOp::Delete(_) => Self::InSubtraction,
        }
    }
}

/// Turns an [`EditScript`] into a single marked-up string.
#[derive(Clone, Debug, Default)]
pub struct ChangeRenderer {
    style: SpanStyle,
}

impl ChangeRenderer {
    pub fn new(style: SpanStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &SpanStyle {
        &self.style
    }

    pub fn render(&self, script: &EditScript) -> RenderedChange {
        let mut out = RenderedChange {
            markup: String::with_capacity(script.len()),
            ..Default::default()
        };
        let mut state = RenderState::Neutral;

        for op in script {
            let next = RenderState::for_op(op);
            if next != state {
                self.leave(state, &mut out);
                self.enter(next, &mut out);
                state = next;
            }
            self.push_unit(op.unit(), &mut out.markup);
        }
        self.leave(state, &mut out);

        out
    }

    fn enter(&self, state: RenderState, out: &mut RenderedChange) {
        match state {
            RenderState::Neutral => {}
            RenderState::InAddition => {
                out.markup.push_str(&self.style.addition_open);
                out.additions += 1;
            }
            RenderState::InSubtraction => {
                out.markup.push_str(&self.style.subtraction_open);
                out.subtractions += 1;
            }
        }
    }

    fn leave(&self, state: RenderState, out: &mut RenderedChange) {
        match state {
            RenderState::Neutral => {}
            RenderState::InAddition => out.markup.push_str(&self.style.addition_close),
            RenderState::InSubtraction => out.markup.push_str(&self.style.subtraction_close),
        }
    }

    fn push_unit(&self, c: char, markup: &mut String) {
        if !self.style.escape_html {
            markup.push(c);
            return;
        }
        match c {
            '&' => markup.push_str("&amp;"),
            '<' => markup.push_str("&lt;"),
            '>' => markup.push_str("&gt;"),
            '"' => markup.push_str("&quot;"),
            '\'' => markup.push_str("&#39;"),
            c => markup.push(c),
        }
    }
}
