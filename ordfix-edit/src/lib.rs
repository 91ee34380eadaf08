//! Edit synthesis and application for ordfix reconciliations.
//!
//! Responsibilities:
//! - Turn a reconciliation into a non-overlapping, ordered edit set:
//!   reorder element spans (leading comment blocks travel with their
//!   element), relocate same-line trailing comments, rewrite blank-line
//!   runs between groups, and insert required group header comments.
//! - Apply an edit set to a buffer in one left-to-right pass.
//! - Render a unified diff preview of the result.
//!
//! Reporting and fixing stay decoupled: nothing here is required to
//! consume a reconciliation's violations.

mod error;

pub use error::{EditError, EditResult};

use diffy::PatchFormatter;
use ordfix_types::edit::TextEdit;
use ordfix_types::element::{Element, Span};
use ordfix_types::outcome::Reconciliation;
use tracing::debug;

/// Synthesize the edit set that turns `source` into the desired region.
///
/// An already-clean region synthesizes zero edits.
pub fn plan_edits(
    source: &str,
    elements: &[Element],
    recon: &Reconciliation,
) -> EditResult<Vec<TextEdit>> {
    let count = elements.len();
    if recon.desired.len() != count {
        return Err(EditError::LengthMismatch {
            elements: count,
            desired: recon.desired.len(),
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    // The movable unit: element text plus its attached leading comment
    // block. Trailing comments are relocated separately so separators
    // between elements stay put.
    let movable: Vec<Span> = elements
        .iter()
        .map(|el| match el.comment_above {
            Some(above) => el.span.cover(above),
            None => el.span,
        })
        .collect();
    let full: Vec<Span> = elements.iter().map(Element::full_span).collect();

    for (index, span) in full.iter().enumerate() {
        check_span(source, *span)?;
        if index > 0 && full[index - 1].end > span.start {
            return Err(EditError::OverlappingSpans { index });
        }
    }
    for &slot in &recon.desired {
        if slot >= count {
            return Err(EditError::SlotOutOfRange { slot, count });
        }
    }

    let mut edits: Vec<TextEdit> = Vec::new();
    let mut replacements: Vec<Option<String>> = vec![None; count];

    for slot in 0..count {
        let original = recon.desired[slot];
        if original != slot {
            replacements[slot] = Some(slice(source, movable[original]).to_string());
            relocate_trailing_comment(source, elements, &movable, slot, original, &mut edits);
        }
    }

    for insertion in &recon.comment_insertions {
        let slot = insertion.slot;
        if slot >= count {
            return Err(EditError::SlotOutOfRange { slot, count });
        }
        let indent = line_indent(source, movable[slot].start);
        let comment = format!("// {}\n{}", insertion.text, indent);
        match &mut replacements[slot] {
            Some(text) => text.insert_str(0, &comment),
            None => edits.push(TextEdit::insert(movable[slot].start, comment)),
        }
    }

    for (slot, replacement) in replacements.into_iter().enumerate() {
        if let Some(text) = replacement {
            edits.push(TextEdit::replace(movable[slot], text));
        }
    }

    for requirement in &recon.spacing {
        let gap = requirement.gap;
        if gap + 1 >= count {
            return Err(EditError::SlotOutOfRange { slot: gap + 1, count });
        }
        let gap_span = Span::new(full[gap].end, movable[gap + 1].start);
        if let Some(edit) = respace_gap(source, gap_span, requirement.blank_lines) {
            edits.push(edit);
        }
    }

    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));
    let mut cursor = 0;
    for edit in &edits {
        if edit.range.start < cursor {
            return Err(EditError::OverlappingEdits {
                at: edit.range.start,
            });
        }
        cursor = edit.range.end;
    }

    debug!(edits = edits.len(), elements = count, "planned edits for region");
    Ok(edits)
}

/// Apply an ordered, non-overlapping edit set in one pass.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> EditResult<String> {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in edits {
        let Span { start, end } = edit.range;
        if start < cursor {
            return Err(EditError::OverlappingEdits { at: start });
        }
        check_span(source, edit.range)?;
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.replacement);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Unified diff between the region before and after fixing; empty when
/// nothing changed.
pub fn render_patch(before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let patch = diffy::create_patch(before, after);
    let formatter = PatchFormatter::new();
    let mut out = formatter.fmt_patch(&patch).to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Plan, apply, and render in one step for preview/report use.
pub fn preview_patch(
    source: &str,
    elements: &[Element],
    recon: &Reconciliation,
) -> EditResult<String> {
    let edits = plan_edits(source, elements, recon)?;
    let after = apply_edits(source, &edits)?;
    Ok(render_patch(source, &after))
}

/// Keep the trailing comment that physically follows `slot` in sync with
/// the element moving there.
fn relocate_trailing_comment(
    source: &str,
    elements: &[Element],
    movable: &[Span],
    slot: usize,
    original: usize,
    edits: &mut Vec<TextEdit>,
) {
    let old = elements[slot].trailing_comment;
    let new = elements[original].trailing_comment;

    match (old, new) {
        (None, None) => {}
        (Some(old_span), Some(new_span)) => {
            let text = slice(source, new_span);
            if slice(source, old_span) != text {
                edits.push(TextEdit::replace(old_span, text));
            }
        }
        (Some(old_span), None) => {
            // Drop the stale comment together with the padding before it.
            let mut start = old_span.start;
            let line_tail = &source[movable[slot].end..old_span.start];
            let padding = line_tail
                .chars()
                .rev()
                .take_while(|c| *c == ' ' || *c == '\t')
                .map(char::len_utf8)
                .sum::<usize>();
            start -= padding;
            edits.push(TextEdit::replace(Span::new(start, old_span.end), ""));
        }
        (None, Some(new_span)) => {
            let region_end = movable
                .get(slot + 1)
                .map(|next| next.start)
                .unwrap_or(source.len());
            let tail = &source[movable[slot].end..region_end];
            let newline = tail.find('\n').map(|at| movable[slot].end + at);
            let after_content = tail
                .char_indices()
                .rev()
                .find(|(_, c)| !c.is_whitespace())
                .map(|(at, c)| movable[slot].end + at + c.len_utf8())
                .unwrap_or(movable[slot].end);
            // Before the line break, but never inside a later spacing
            // rewrite of the same gap.
            let at = newline.map_or(after_content, |nl| nl.min(after_content));
            edits.push(TextEdit::insert(at, format!(" {}", slice(source, new_span))));
        }
    }
}

/// Rewrite the trailing whitespace run of one gap to exactly the required
/// number of blank lines, leaving separators and loose comments alone.
fn respace_gap(source: &str, gap: Span, required: u32) -> Option<TextEdit> {
    let text = &source[gap.start..gap.end];
    let tail_start = text
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(at, c)| at + c.len_utf8())
        .unwrap_or(0);
    let tail = &text[tail_start..];
    let newlines = tail.matches('\n').count() as u32;

    let new_tail = if newlines == 0 {
        // Same-line layout: nothing to collapse, and forcing blank lines
        // onto a single-line region only applies when spacing is required.
        if required == 0 {
            return None;
        }
        "\n".repeat(required as usize + 1)
    } else {
        if newlines.saturating_sub(1) == required {
            return None;
        }
        let indent = tail.rfind('\n').map(|at| &tail[at + 1..]).unwrap_or("");
        let mut rebuilt = "\n".repeat(required as usize + 1);
        rebuilt.push_str(indent);
        rebuilt
    };

    if tail == new_tail {
        return None;
    }
    Some(TextEdit::replace(
        Span::new(gap.start + tail_start, gap.end),
        new_tail,
    ))
}

fn check_span(source: &str, span: Span) -> EditResult<()> {
    if span.end < span.start || span.end > source.len() {
        return Err(EditError::SpanOutOfBounds {
            span,
            len: source.len(),
        });
    }
    if !source.is_char_boundary(span.start) || !source.is_char_boundary(span.end) {
        return Err(EditError::MisalignedSpan { span });
    }
    Ok(())
}

fn slice(source: &str, span: Span) -> &str {
    &source[span.start..span.end]
}

fn line_indent(source: &str, at: usize) -> String {
    let line_start = source[..at].rfind('\n').map(|nl| nl + 1).unwrap_or(0);
    source[line_start..at]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
