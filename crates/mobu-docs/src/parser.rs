//! Doxygen member-item extraction.
//!
//! The documentation pages are Doxygen-generated: each documented member
//! sits in a `div.memitem` block with a `td.memname` header cell holding
//! the combined "Type Name" string, a parameter table of adjacent
//! `td.paramtype`/`td.paramname` cell pairs, and a `div.memdoc` body.
//!
//! Pages whose HTML doesn't match this layout yield an empty member set —
//! the pipeline then degrades to un-annotated signatures. A parameter table
//! whose type and name cell counts disagree is different: that signals a
//! parser bug, and continuing would attach corrupted names to types, so it
//! fails the page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{DocsError, Result};
use crate::markdown::html_to_markdown;
use crate::records::{DocMember, DocPage, DocParam};

static MEMITEM_SEL: LazyLock<Selector> = LazyLock::new(|| sel("div.memitem"));
static MEMNAME_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.memname"));
static PARAMTYPE_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.paramtype"));
static PARAMNAME_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.paramname"));
static MEMDOC_SEL: LazyLock<Selector> = LazyLock::new(|| sel("div.memdoc"));

fn sel(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

/// Parse one documentation page into its member records.
pub fn parse_page(page_name: &str, html: &str, source_url: &str) -> Result<DocPage> {
    let doc = Html::parse_document(html);
    let mut members = Vec::new();

    for item in doc.select(&MEMITEM_SEL) {
        match parse_member(page_name, item, source_url)? {
            Some(member) => members.push(member),
            None => continue,
        }
    }

    if members.is_empty() {
        tracing::debug!(page = %page_name, "no member items found on page");
    }

    Ok(DocPage {
        name: page_name.to_string(),
        members,
    })
}

fn parse_member(
    page_name: &str,
    item: ElementRef<'_>,
    source_url: &str,
) -> Result<Option<DocMember>> {
    let Some(memname) = item.select(&MEMNAME_SEL).next() else {
        return Ok(None);
    };
    let header = memname.text().collect::<String>();
    let Some((type_name, name)) = split_name_type(&header) else {
        return Ok(None);
    };

    let params = parse_params(page_name, &name, item)?;

    let doc = item
        .select(&MEMDOC_SEL)
        .next()
        .map(|d| html_to_markdown(&d.inner_html()))
        .unwrap_or_default();

    Ok(Some(DocMember {
        name,
        type_name,
        doc,
        params,
        source_url: source_url.to_string(),
    }))
}

/// Split the combined "Type Name" header cell: the final whitespace token is
/// the member name (any `Class::`/`Class.` qualifier stripped), everything
/// before it is the declared type. A header with a single token is a
/// constructor-style entry with no declared type.
fn split_name_type(header: &str) -> Option<(String, String)> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }
    let (type_name, qualified) = match header.rsplit_once(char::is_whitespace) {
        Some((t, n)) => (t.trim().to_string(), n),
        None => (String::new(), header),
    };
    let name = qualified
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(qualified)
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }
    Some((type_name, name))
}

fn parse_params(page_name: &str, member: &str, item: ElementRef<'_>) -> Result<Vec<DocParam>> {
    let types: Vec<String> = item
        .select(&PARAMTYPE_SEL)
        .map(|c| c.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let names: Vec<String> = item
        .select(&PARAMNAME_SEL)
        .map(|c| c.text().collect::<String>().trim().to_string())
        .filter(|n| !n.is_empty() && n != ")")
        .collect();

    if types.len() != names.len() {
        return Err(DocsError::ParamTableShape {
            member: member.to_string(),
            page: page_name.to_string(),
            types: types.len(),
            names: names.len(),
        });
    }

    Ok(types
        .into_iter()
        .zip(names)
        .map(|(type_name, raw_name)| {
            let cleaned = raw_name.trim_end_matches([',', ' ']);
            // "pName=kDefaultValue" embeds the default in the name cell.
            let (name, default) = match cleaned.split_once('=') {
                Some((n, d)) => (n.trim().to_string(), Some(d.trim().to_string())),
                None => (cleaned.to_string(), None),
            };
            DocParam {
                name,
                type_name,
                default,
            }
        })
        .collect())
}
