pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// `html2md` with setext `h1`/`h2` underlines rewritten as ATX `#`/`##` headings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        atx_headings(&html2md::parse_html(html))
    }
}

/// Rewrites setext headings as ATX. Every line of the paragraph above the
/// underline belongs to the heading, so hard breaks are folded into spaces.
pub fn atx_headings(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if in_fence {
            in_fence = !is_fence(line);
            out.push(line.to_string());
        } else if is_fence(line) || line.trim().is_empty() {
            flush_paragraph(&mut out, &mut paragraph);
            in_fence = is_fence(line);
            out.push(line.to_string());
        } else if let Some(level) = setext_level(line).filter(|_| is_heading_text(&paragraph)) {
            out.push(atx_line(level, &paragraph));
            paragraph.clear();
        } else {
            paragraph.push(line);
        }
    }
    flush_paragraph(&mut out, &mut paragraph);

    let mut result = out.join("\n");
    if markdown.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn flush_paragraph(out: &mut Vec<String>, paragraph: &mut Vec<&str>) {
    out.extend(paragraph.drain(..).map(str::to_string));
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn setext_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// An indented first line is a code block, which cannot carry an underline.
fn is_heading_text(paragraph: &[&str]) -> bool {
    paragraph
        .first()
        .is_some_and(|first| !first.starts_with("    ") && !first.starts_with('\t'))
}

fn atx_line(level: usize, paragraph: &[&str]) -> String {
    let text = paragraph
        .iter()
        .map(|line| line.trim().trim_end_matches('\\').trim_end())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {}", "#".repeat(level), escape_ordered_marker(&text))
}

/// `1. Intro` -> `1\. Intro`, so the heading text never reads as a list item.
fn escape_ordered_marker(text: &str) -> String {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    match text[digits..].chars().next() {
        Some(marker @ ('.' | ')')) if digits > 0 => {
            format!("{}\\{marker}{}", &text[..digits], &text[digits + 1..])
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{atx_headings, Converter, Html2MdConverter};
    use pretty_assertions::assert_eq;

    #[test]
    fn setext_underlines_become_atx() {
        let md = "Title\n==========\n\nSub\n----------\n\nbody\n";
        assert_eq!(atx_headings(md), "# Title\n\n## Sub\n\nbody\n");
    }

    #[test]
    fn thematic_break_after_blank_line_is_kept() {
        let md = "para\n\n---\n\nmore";
        assert_eq!(atx_headings(md), md);
    }

    #[test]
    fn fenced_code_is_untouched() {
        let md = "```\nnot a title\n===\n```";
        assert_eq!(atx_headings(md), md);
    }

    #[test]
    fn multi_line_paragraph_becomes_one_heading() {
        let md = "Multi  \nline\n====\n\nbody";
        assert_eq!(atx_headings(md), "# Multi line\n\nbody");
    }

    #[test]
    fn numbered_heading_is_escaped() {
        let md = "1. Introduction\n----------\n\nx";
        assert_eq!(atx_headings(md), "## 1\\. Introduction\n\nx");
    }

    #[test]
    fn indented_code_is_not_promoted() {
        let md = "    let x = 1;\n---";
        assert_eq!(atx_headings(md), md);
    }

    #[test]
    fn line_break_inside_h1_stays_in_the_heading() {
        let md = Html2MdConverter.to_markdown("<h1>Multi<br>line</h1>");
        assert_eq!(md, "# Multi line");
    }

    #[test]
    fn numbered_h2_keeps_its_number() {
        let md = Html2MdConverter.to_markdown("<h2>1. Introduction</h2><p>x</p>");
        assert_eq!(md, "## 1\\. Introduction\n\nx");
    }
}
