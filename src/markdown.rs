//! Markdown primitives.
//!
//! Escaping of literal text, code fences and GFM tables, shared by the
//! markdown normalizer.

use dom_query::Selection;

/// Escape text so it renders literally, touching only what would otherwise
/// turn into markup.
///
/// # Characters Escaped
///
/// - `*` / `_` runs at a word edge (could open or close emphasis); intraword
///   runs such as `a*b` or `snake_case` and free-standing `2 * 3` stay
/// - `` ` `` (prevents inline code)
/// - `[` when a `](` follows (prevents links)
/// - `<` before a letter, `/`, `!` or `?` (prevents HTML and autolinks)
/// - `\` before ASCII punctuation (would escape it)
///
/// Line-leading block markers are handled by [`escape_line_start`].
///
/// # Examples
///
/// ```
/// use web_distill::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*"), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name"), "my_variable_name");
/// assert_eq!(escape_markdown("see [x](y) and [z]"), r"see \[x](y) and [z]");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let escape = match ch {
            '*' | '_' => {
                let end = i + chars[i..].iter().take_while(|c| **c == ch).count();
                let before = i.checked_sub(1).map(|j| chars[j]);
                let after = chars.get(end).copied();
                let at_word_edge = is_word_char(before) != is_word_char(after);
                for _ in i..end {
                    if at_word_edge {
                        result.push('\\');
                    }
                    result.push(ch);
                }
                i = end;
                continue;
            }
            '`' => true,
            '[' => opens_link(&chars[i + 1..]),
            '<' => chars
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')),
            '\\' => chars.get(i + 1).is_some_and(char::is_ascii_punctuation),
            _ => false,
        };
        if escape {
            result.push('\\');
        }
        result.push(ch);
        i += 1;
    }
    result
}

fn is_word_char(ch: Option<char>) -> bool {
    ch.is_some_and(char::is_alphanumeric)
}

/// Whether a `](` follows, making a preceding `[` a link opener.
fn opens_link(rest: &[char]) -> bool {
    rest.windows(2).any(|pair| pair == [']', '('])
}

/// Escape a line-leading character that would otherwise start a block
/// (`#` heading, `>` quote, `-`/`+`/`*` list item, `1.` ordered item, or a
/// rule/setext underline such as `---`).
#[must_use]
pub fn escape_line_start(line: &str) -> String {
    let trimmed = line.trim_start();
    let needs_escape = is_atx_marker(trimmed)
        || trimmed.starts_with('>')
        || trimmed.starts_with("- ")
        || trimmed.starts_with("+ ")
        || trimmed.starts_with("* ")
        || is_rule_line(trimmed)
        || ordered_marker_len(trimmed).is_some();
    if !needs_escape {
        return line.to_string();
    }
    match ordered_marker_len(trimmed) {
        Some(digits) => format!("{}\\{}", &trimmed[..digits], &trimmed[digits..]),
        None => format!("\\{trimmed}"),
    }
}

/// `#` to `######` followed by whitespace or nothing.
fn is_atx_marker(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes) && line[hashes..].chars().next().is_none_or(char::is_whitespace)
}

/// A line of only `-`, `=`, `*` or `_` (and spaces).
fn is_rule_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| matches!(c, '-' | '=' | '*' | '_' | ' '))
}

/// Digits before a `1. ` style marker.
fn ordered_marker_len(line: &str) -> Option<usize> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0 && line[digits..].starts_with(". ")).then_some(digits)
}

/// Wrap `code` in a fenced block whose fence outruns any backtick run inside.
///
/// # Examples
///
/// ```
/// use web_distill::markdown::fence_code;
///
/// assert_eq!(fence_code("let x = 1;"), "```\nlet x = 1;\n```");
/// ```
#[must_use]
pub fn fence_code(code: &str) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let code = code.trim_matches('\n');
    format!("{fence}\n{code}\n{fence}")
}

/// Wrap `code` in backticks for inline use.
#[must_use]
pub fn inline_code(code: &str) -> String {
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

/// Convert a `<table>` to GitHub Flavored Markdown.
///
/// The first row is the header row. Returns an empty string for tables
/// without cells.
///
/// # Example Output
///
/// ```text
/// | Header A | Header B |
/// | -------- | -------- |
/// | Cell 1   | Cell 2   |
/// ```
#[must_use]
pub fn table_to_markdown(table: &Selection) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut alignments: Vec<Alignment> = Vec::new();

    for tr in table.select("tr").iter() {
        let mut row = Vec::new();
        for (i, cell) in tr.select("th, td").iter().enumerate() {
            let text = cell_text(&cell);
            if rows.is_empty() {
                alignments.push(cell.attr("align").map_or(Alignment::None, |a| Alignment::parse(&a)));
            } else if alignments.get(i) == Some(&Alignment::None) {
                if let Some(align) = cell.attr("align") {
                    alignments[i] = Alignment::parse(&align);
                }
            }
            row.push(text);
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut col_widths: Vec<usize> = vec![3; col_count];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }
    alignments.resize(col_count, Alignment::None);

    let mut output = String::new();
    for (row_idx, row) in rows.iter().enumerate() {
        output.push('|');
        for (col_idx, width) in col_widths.iter().enumerate() {
            let cell = row.get(col_idx).map_or("", String::as_str);
            output.push(' ');
            output.push_str(&pad_cell(cell, *width, alignments[col_idx]));
            output.push_str(" |");
        }
        output.push('\n');

        if row_idx == 0 {
            output.push('|');
            for (col_idx, width) in col_widths.iter().enumerate() {
                output.push_str(&format_separator(*width, alignments[col_idx]));
                output.push('|');
            }
            output.push('\n');
        }
    }

    output.trim_end().to_string()
}

fn cell_text(cell: &Selection) -> String {
    let text = cell.text();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    escape_markdown(&collapsed).replace('|', "\\|")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }
}

fn format_separator(width: usize, align: Alignment) -> String {
    let dashes = width.max(3);
    match align {
        Alignment::Left => format!(" :{} ", "-".repeat(dashes - 1)),
        Alignment::Center => format!(" :{}: ", "-".repeat(dashes - 2)),
        Alignment::Right => format!(" {}: ", "-".repeat(dashes - 1)),
        Alignment::None => format!(" {} ", "-".repeat(dashes)),
    }
}

fn pad_cell(text: &str, width: usize, align: Alignment) -> String {
    let text_len = text.chars().count();
    if text_len >= width {
        return text.to_string();
    }

    let padding = width - text_len;
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left = padding / 2;
            let right = padding - left;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
        }
        Alignment::None | Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
    }
}

/// Whether `table` is laid out for presentation rather than data.
#[must_use]
pub fn is_layout_table(table: &Selection) -> bool {
    if table
        .attr("role")
        .is_some_and(|role| role.eq_ignore_ascii_case("presentation"))
    {
        return true;
    }
    table
        .select("td")
        .iter()
        .any(|td| td.select("p, div, table, ul, ol, h1, h2, h3").exists())
}
