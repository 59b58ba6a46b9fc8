//! Lossy HTML-to-restricted-markdown conversion for documentation bodies.
//!
//! The output is documentation prose, not a contract: headings flatten to
//! `###`, Doxygen parameter/return-value tables become bullet lists, code
//! fragments become fenced blocks, and `Null`/`NULL` mentions normalize to
//! `None`. The conversion must be deterministic for a fixed input string —
//! it is pinned by golden tests below.

use std::sync::LazyLock;

use regex::Regex;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

static LINE_SEL: LazyLock<Selector> = LazyLock::new(|| sel("div.line"));
static TR_SEL: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td"));
static NULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:NULL|Null)\b").expect("valid regex"));

fn sel(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    for child in fragment.root_element().children() {
        emit(child, &mut out);
    }
    tidy(&out)
}

fn emit(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&text),
        Node::Element(el) => {
            let name = el.name().to_ascii_lowercase();
            let classes = el.attr("class").unwrap_or("");
            emit_element(node, &name, classes, out);
        }
        _ => {}
    }
}

fn emit_element(node: NodeRef<'_, Node>, name: &str, classes: &str, out: &mut String) {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "dt" => {
            out.push_str("\n\n### ");
            out.push_str(text_of(node).trim());
            out.push_str("\n\n");
        }
        // Doxygen sample-code region: one div.line per source line.
        "div" if has_class(classes, "fragment") => {
            out.push_str("\n\n```\n");
            if let Some(el) = ElementRef::wrap(node) {
                let mut any = false;
                for line in el.select(&LINE_SEL) {
                    out.push_str(line.text().collect::<String>().trim_end());
                    out.push('\n');
                    any = true;
                }
                if !any {
                    for raw in el.text().collect::<String>().lines() {
                        out.push_str(raw.trim_end());
                        out.push('\n');
                    }
                }
            }
            out.push_str("```\n\n");
        }
        // Parameter/return-value tables become bullet lists.
        "table" if has_class(classes, "params") || has_class(classes, "retval") => {
            if let Some(el) = ElementRef::wrap(node) {
                for row in el.select(&TR_SEL) {
                    emit_param_row(row, out);
                }
            }
            out.push('\n');
        }
        "li" => {
            out.push_str("\n- ");
            recurse(node, out);
            out.push('\n');
        }
        "p" => {
            out.push_str("\n\n");
            recurse(node, out);
            out.push_str("\n\n");
        }
        "code" | "tt" => {
            out.push('`');
            out.push_str(text_of(node).trim());
            out.push('`');
        }
        "pre" => {
            out.push_str("\n\n```\n");
            for raw in text_of(node).lines() {
                out.push_str(raw.trim_end());
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        "br" => out.push('\n'),
        "script" | "style" => {}
        "div" | "dd" | "dl" | "ul" | "ol" | "table" => {
            out.push('\n');
            recurse(node, out);
            out.push('\n');
        }
        // a, span, b, em, strong, td, tr and anything unrecognized: inline.
        _ => recurse(node, out),
    }
}

fn emit_param_row(row: ElementRef<'_>, out: &mut String) {
    let mut name = String::new();
    let mut desc = String::new();
    for cell in row.select(&TD_SEL) {
        let text = cell.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let is_name_cell = cell
            .value()
            .attr("class")
            .is_some_and(|c| has_class(c, "paramname"));
        if is_name_cell && name.is_empty() {
            name = text.to_string();
        } else {
            if !desc.is_empty() {
                desc.push(' ');
            }
            desc.push_str(text);
        }
    }
    if name.is_empty() && desc.is_empty() {
        return;
    }
    out.push_str("\n- ");
    if !name.is_empty() {
        out.push('`');
        out.push_str(&name);
        out.push('`');
        if !desc.is_empty() {
            out.push_str(" : ");
        }
    }
    out.push_str(&desc);
}

fn recurse(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        emit(child, out);
    }
}

fn text_of(node: NodeRef<'_, Node>) -> String {
    ElementRef::wrap(node)
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

fn has_class(classes: &str, wanted: &str) -> bool {
    classes.split_whitespace().any(|c| c == wanted)
}

/// Whitespace normalization: collapse runs outside code fences, trim line
/// ends, squeeze blank-line runs, strip the surrounding blank space.
fn tidy(raw: &str) -> String {
    let replaced = raw.replace('\u{a0}', " ");
    let replaced = NULL_RE.replace_all(&replaced, "None");

    let mut lines: Vec<String> = Vec::new();
    let mut in_fence = false;
    for line in replaced.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            lines.push(trimmed.to_string());
            continue;
        }
        if in_fence {
            lines.push(line.trim_end().to_string());
        } else {
            lines.push(collapse_spaces(trimmed));
        }
    }

    let mut out: Vec<String> = Vec::new();
    for line in lines {
        if line.is_empty() && out.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paragraphs() {
        let md = html_to_markdown("<p>First paragraph.</p><p>Second   paragraph.</p>");
        assert_eq!(md, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_headings_flatten_to_h3() {
        let md = html_to_markdown("<h1>Title</h1><p>Body</p><h4>Sub</h4>");
        assert_eq!(md, "### Title\n\nBody\n\n### Sub");
    }

    #[test]
    fn test_null_normalization() {
        let md = html_to_markdown("<p>Returns NULL if empty, or Null on error.</p>");
        assert_eq!(md, "Returns None if empty, or None on error.");
        // Word-boundary only: "Nullable" is untouched.
        let md = html_to_markdown("<p>Nullable fields.</p>");
        assert_eq!(md, "Nullable fields.");
    }

    #[test]
    fn test_parameters_section_becomes_bullets() {
        let html = r#"
            <dl class="params"><dt>Parameters</dt><dd>
              <table class="params">
                <tr><td class="paramname">pModel</td><td>Model to attach.</td></tr>
                <tr><td class="paramname">pIndex</td><td>Target index.</td></tr>
              </table>
            </dd></dl>"#;
        let md = html_to_markdown(html);
        assert_eq!(
            md,
            "### Parameters\n\n- `pModel` : Model to attach.\n- `pIndex` : Target index."
        );
    }

    #[test]
    fn test_return_values_section() {
        let html = r#"
            <dl class="retval"><dt>Return values</dt><dd>
              <table class="retval">
                <tr><td class="paramname">true</td><td>On success.</td></tr>
              </table>
            </dd></dl>"#;
        let md = html_to_markdown(html);
        assert_eq!(md, "### Return values\n\n- `true` : On success.");
    }

    #[test]
    fn test_code_fragment_fenced() {
        let html = r#"
            <p>Example:</p>
            <div class="fragment">
              <div class="line">model = FBModel()</div>
              <div class="line">model.Show = True</div>
            </div>"#;
        let md = html_to_markdown(html);
        assert_eq!(
            md,
            "Example:\n\n```\nmodel = FBModel()\nmodel.Show = True\n```"
        );
    }

    #[test]
    fn test_inline_code() {
        let md = html_to_markdown("<p>Use <code>FBSystem()</code> to start.</p>");
        assert_eq!(md, "Use `FBSystem()` to start.");
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let html = r#"<h2>Detail</h2><p>Some  text with NULL.</p>
            <div class="fragment"><div class="line">x = 1</div></div>"#;
        let first = html_to_markdown(html);
        let second = html_to_markdown(html);
        assert_eq!(first, second);
        insta::assert_snapshot!(first, @r"
        ### Detail

        Some text with None.

        ```
        x = 1
        ```
        ");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(html_to_markdown(""), "");
        assert_eq!(html_to_markdown("<p></p>"), "");
        assert_eq!(html_to_markdown("just bare text"), "just bare text");
    }
}
