//! Plain-text board emitter and numeric display helpers.
//!
//! The text rendering exists for the CLI preview and the print/export path:
//! it walks the already-projected board, so it stays a dumb serializer with
//! no layout decisions of its own.

use super::model::{Block, BlockBody, BlockWidth, Board};

/// Format a value with comma-grouped thousands, preserving any fraction.
///
/// `1234.5` renders as `1,234.5`; `-2000` as `-2,000`.
pub fn group_thousands(value: f64) -> String {
    let rendered = format!("{value}");
    let (sign, magnitude) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (integer, fraction) = match magnitude.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (magnitude, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::new();
    for (offset, digit) in digits.iter().enumerate() {
        let remaining = digits.len() - offset;
        if offset > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Emit the board as plain text, one section at a time.
pub fn format_board(board: &Board) -> String {
    let mut out = String::new();
    append_header(&mut out, board);
    for block in &board.blocks {
        append_block(&mut out, block);
    }
    append_sources(&mut out, board);
    append_footer(&mut out, board);
    out
}

fn append_header(out: &mut String, board: &Board) {
    out.push_str(&format!("= {} =\n", board.title));
    out.push_str(&format!("{}\n", board.subtitle));
    out.push_str(&format!(
        "theme {}  background {}\n\n",
        board.theme_color, board.background_color
    ));
}

fn append_block(out: &mut String, block: &Block) {
    let width = match block.width {
        BlockWidth::Full => "full",
        BlockWidth::Half => "half",
    };
    out.push_str(&format!("== {} [{width}]\n", block.title));
    if let Some(description) = &block.description {
        out.push_str(&format!("{description}\n"));
    }
    if let Some(chart_description) = &block.chart_description {
        out.push_str(&format!("({chart_description})\n"));
    }
    append_body(out, block);
    out.push('\n');
}

fn append_body(out: &mut String, block: &Block) {
    match &block.body {
        BlockBody::Chart { chart, series } => {
            out.push_str(&format!("[{} chart]\n", chart.as_str()));
            for point in series {
                out.push_str(&format!(
                    "  {}  {}  {}\n",
                    point.name,
                    group_thousands(point.value),
                    point.color
                ));
            }
        }
        BlockBody::Stats { cards } => {
            for card in cards {
                match &card.label {
                    Some(label) => out.push_str(&format!(
                        "  {}  {}  {}\n",
                        card.value_text, card.name, label
                    )),
                    None => out.push_str(&format!("  {}  {}\n", card.value_text, card.name)),
                }
            }
        }
        BlockBody::List { rows } => {
            for row in rows {
                out.push_str(&format!("  {}. {}  {}\n", row.ordinal, row.name, row.text));
            }
        }
    }
}

fn append_sources(out: &mut String, board: &Board) {
    if board.sources.is_empty() {
        return;
    }
    out.push_str("sources:\n");
    for source in &board.sources {
        out.push_str(&format!("  {} <{}>\n", source.title, source.uri));
    }
    out.push('\n');
}

fn append_footer(out: &mut String, board: &Board) {
    if let Some(footer) = &board.footer {
        out.push_str(&format!("-- {footer}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_thousands_groups_integer_digits() {
        assert_eq!(group_thousands(1234.5), "1,234.5");
        assert_eq!(group_thousands(1000000.0), "1,000,000");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn group_thousands_handles_negatives_and_small_fractions() {
        assert_eq!(group_thousands(-2000.0), "-2,000");
        assert_eq!(group_thousands(2.25), "2.25");
    }
}
