//! The signature-docstring grammar parser.
//!
//! The binding attaches a self-describing signature string to every
//! callable, one line per overload:
//!
//! ```text
//! Name( (Type)param1 [, (Type)param2 ...]) -> ReturnType
//! ```
//!
//! Required parameters precede the first `[`; everything bracketed is
//! optional and carries the "no value provided" sentinel. This is the only
//! source of parameter/return shape at reflection time, and it is fragile:
//! every other component operates on the parsed `StubFunction` model, never
//! on raw docstrings. Malformed lines are skipped without failing the run;
//! a missing docstring contributes zero overloads.

use crate::model::{ParamDefault, StubFunction, StubParameter};

/// Parse a callable's docstring into its overloads, in line order.
pub fn parse_signature_docstring(name: &str, doc: Option<&str>) -> Vec<StubFunction> {
    let Some(doc) = doc else {
        return Vec::new();
    };
    let mut overloads = Vec::new();
    for line in doc.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(name, line) {
            Some(function) => overloads.push(function),
            None => {
                tracing::trace!(function = %name, line = %line, "skipping non-signature line");
            }
        }
    }
    overloads
}

fn parse_line(name: &str, line: &str) -> Option<StubFunction> {
    let rest = line.strip_prefix(name)?;
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return None;
    }

    let (head, return_type) = match line.rfind("->") {
        Some(idx) => {
            let ret = line[idx + 2..].trim();
            (
                &line[..idx],
                if ret.is_empty() {
                    None
                } else {
                    Some(ret.to_string())
                },
            )
        }
        None => (line, None),
    };

    let open = head.find('(')?;
    let close = head.rfind(')')?;
    if close <= open {
        return None;
    }

    let parameters = parse_params(&head[open + 1..close])?;

    let mut function = StubFunction::new(name);
    function.parameters = parameters;
    function.return_type = return_type;
    Some(function)
}

fn parse_params(inner: &str) -> Option<Vec<StubParameter>> {
    let mut params = Vec::new();
    // Set once the first `[` is seen; brackets nest in the grammar but
    // never close before the parameter list ends, so optionality is sticky.
    let mut optional = false;

    for piece in split_top_level(inner) {
        // A `[` before this piece's type marker makes the piece itself
        // optional; a `[` after it applies from the next parameter on.
        let bracket_before = piece
            .find('[')
            .map(|bi| piece.find('(').is_none_or(|pi| bi < pi))
            .unwrap_or(false);
        if bracket_before {
            optional = true;
        }
        let this_optional = optional;
        if piece.contains('[') {
            optional = true;
        }

        let cleaned = piece.replace(['[', ']'], " ");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }

        let rest = cleaned.strip_prefix('(')?;
        let (type_name, raw_name) = rest.split_once(')')?;
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return None;
        }

        let param_name = match raw_name.trim() {
            "" => format!("arg{}", params.len() + 1),
            n => n.to_string(),
        };

        let mut param = StubParameter::new(param_name, Some(type_name.to_string()));
        if this_optional {
            param.default = ParamDefault::Unspecified;
        }
        params.push(param);
    }
    Some(params)
}

/// Split on commas outside type parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&s[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The canonical grammar round trip: two required parameters, one
    /// bracketed optional, and a return type.
    #[test]
    fn test_grammar_round_trip() {
        let overloads = parse_signature_docstring(
            "Foo",
            Some("Foo( (int)arg1, (str)arg2 [, (bool)arg3]) -> bool"),
        );
        assert_eq!(overloads.len(), 1);
        let f = &overloads[0];
        assert_eq!(f.parameters.len(), 3);
        assert_eq!(f.parameters[0].name, "arg1");
        assert_eq!(f.parameters[0].type_name.as_deref(), Some("int"));
        assert_eq!(f.parameters[0].default, ParamDefault::Required);
        assert_eq!(f.parameters[1].default, ParamDefault::Required);
        assert_eq!(f.parameters[2].name, "arg3");
        assert_eq!(f.parameters[2].type_name.as_deref(), Some("bool"));
        assert_eq!(f.parameters[2].default, ParamDefault::Unspecified);
        assert_eq!(f.return_type.as_deref(), Some("bool"));
    }

    #[test]
    fn test_one_line_per_overload() {
        let overloads = parse_signature_docstring(
            "Pick",
            Some("Pick( (int)pIndex) -> bool\nPick( (str)pName) -> bool"),
        );
        assert_eq!(overloads.len(), 2);
        assert_eq!(overloads[0].parameters[0].type_name.as_deref(), Some("int"));
        assert_eq!(overloads[1].parameters[0].type_name.as_deref(), Some("str"));
    }

    #[test]
    fn test_nested_optional_brackets() {
        let overloads = parse_signature_docstring(
            "Make",
            Some("Make( (str)pName [, (bool)pShow [, (int)pCount]]) -> FBModel"),
        );
        let f = &overloads[0];
        assert_eq!(f.parameters.len(), 3);
        assert_eq!(f.parameters[0].default, ParamDefault::Required);
        assert_eq!(f.parameters[1].default, ParamDefault::Unspecified);
        assert_eq!(f.parameters[2].default, ParamDefault::Unspecified);
    }

    #[test]
    fn test_zero_parameters() {
        let overloads = parse_signature_docstring("FBSystem", Some("FBSystem() -> FBSystem"));
        assert_eq!(overloads.len(), 1);
        assert!(overloads[0].parameters.is_empty());
        assert_eq!(overloads[0].return_type.as_deref(), Some("FBSystem"));
    }

    #[test]
    fn test_missing_return_type() {
        let overloads = parse_signature_docstring("Clear", Some("Clear( (bool)pAll)"));
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].return_type, None);
    }

    #[test]
    fn test_missing_docstring_contributes_zero_overloads() {
        assert!(parse_signature_docstring("Foo", None).is_empty());
        assert!(parse_signature_docstring("Foo", Some("")).is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        // Prose, wrong name, unbalanced parens, missing type: all skipped;
        // the one valid line survives.
        let doc = "\
This function does things.
Bar( (int)x) -> int
Foo( (int x) -> int
Foo( int)x) -> int
Foo( (int)x) -> int";
        let overloads = parse_signature_docstring("Foo", Some(doc));
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].parameters.len(), 1);
    }

    #[test]
    fn test_unnamed_parameters_get_positional_names() {
        let overloads = parse_signature_docstring("Set", Some("Set( (int), (str)) -> None"));
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].parameters[0].name, "arg1");
        assert_eq!(overloads[0].parameters[1].name, "arg2");
    }

    #[test]
    fn test_whitespace_tolerance() {
        let overloads =
            parse_signature_docstring("Foo", Some("  Foo(  (int)a ,  (str)b )  ->  None  "));
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].parameters.len(), 2);
        assert_eq!(overloads[0].return_type.as_deref(), Some("None"));
    }
}
