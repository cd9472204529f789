//! # Page Break Decisions
//!
//! Logic for deciding where a message block breaks across pages. A message
//! that fits on a fresh page is kept together; a longer one is split, but
//! never leaves a lone line at the bottom of one page or the top of the next.

const EPSILON: f64 = 1e-6;

/// Decide what to do when a block of lines doesn't fit on the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire block on the current page (it fits).
    Place,
    /// Move the entire block to the next page.
    MoveToNextPage,
    /// Place some lines here, continue on the next page.
    Split {
        /// How many lines go on the current page.
        lines_on_current_page: usize,
    },
}

/// Space limits that apply to one break decision.
#[derive(Debug, Clone, Copy)]
pub struct BreakContext {
    /// Height left between the cursor and the bottom margin.
    pub remaining_height: f64,
    /// Height available on a page with no body content yet.
    pub page_capacity: f64,
    pub line_height: f64,
    pub min_orphan_lines: usize,
    pub min_widow_lines: usize,
}

/// How many lines of `line_height` fit in `height`.
pub fn lines_that_fit(height: f64, line_height: f64) -> usize {
    if line_height <= 0.0 || height < 0.0 {
        return 0;
    }
    ((height + EPSILON) / line_height).floor() as usize
}

/// Given the remaining space on a page and a block of `line_count` lines,
/// decide how to break.
pub fn decide_break(ctx: &BreakContext, line_count: usize) -> BreakDecision {
    let fit_count = lines_that_fit(ctx.remaining_height, ctx.line_height).min(line_count);

    // Easy case: everything fits
    if fit_count == line_count {
        return BreakDecision::Place;
    }

    // Fits on a page of its own: keep it together
    let block_height = line_count as f64 * ctx.line_height;
    if block_height <= ctx.page_capacity + EPSILON {
        return BreakDecision::MoveToNextPage;
    }

    // Would we leave too few lines on the current page? (orphan)
    if fit_count < ctx.min_orphan_lines {
        return BreakDecision::MoveToNextPage;
    }

    // Would we leave too few lines on the next page? (widow)
    let carried = line_count - fit_count;
    if carried < ctx.min_widow_lines {
        let adjusted = fit_count.saturating_sub(ctx.min_widow_lines - carried);
        if adjusted == 0 {
            return BreakDecision::MoveToNextPage;
        }
        return BreakDecision::Split {
            lines_on_current_page: adjusted,
        };
    }

    BreakDecision::Split {
        lines_on_current_page: fit_count,
    }
}
