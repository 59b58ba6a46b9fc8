//! Version-conditioned URL templates for the online documentation.
//!
//! The help site changed its path scheme at the 2022 release: older versions
//! publish the Python reference under `MotionBuilder-SDK/py_ref`, 2022 and
//! later under `MOBU-PYTHON-API-REF`.

/// First host version using the new documentation path scheme.
pub const SCHEME_CHANGE_VERSION: u32 = 2022;

/// Page for module-level free functions (Doxygen namespace page).
pub const MODULE_PAGE: &str = "namespacepyfbsdk.html";

const HELP_ROOT: &str = "https://help.autodesk.com/cloudhelp";

pub fn doc_root(version: u32) -> String {
    if version >= SCHEME_CHANGE_VERSION {
        format!("{HELP_ROOT}/{version}/ENU/MOBU-PYTHON-API-REF")
    } else {
        format!("{HELP_ROOT}/{version}/ENU/MotionBuilder-SDK/py_ref")
    }
}

pub fn page_url(version: u32, relative: &str) -> String {
    format!("{}/{}", doc_root(version), relative.trim_start_matches('/'))
}

pub fn toc_url(version: u32) -> String {
    page_url(version, "contents.js")
}

/// Doxygen file name for a class page: `FBModel` -> `class_f_b_model.html`.
pub fn class_page_file(class_name: &str) -> String {
    let mut out = String::from("class");
    for ch in class_name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out.push_str(".html");
    out
}

/// Filesystem-safe cache key for a URL. Deterministic: the same URL always
/// maps to the same file name.
pub fn cache_key(url: &str) -> String {
    url.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_boundary() {
        assert!(doc_root(2020).contains("MotionBuilder-SDK/py_ref"));
        assert!(doc_root(2022).contains("MOBU-PYTHON-API-REF"));
        assert!(doc_root(2025).contains("MOBU-PYTHON-API-REF"));
    }

    #[test]
    fn test_page_url_joins_cleanly() {
        let url = page_url(2023, "/class_f_b_model.html");
        assert_eq!(
            url,
            "https://help.autodesk.com/cloudhelp/2023/ENU/MOBU-PYTHON-API-REF/class_f_b_model.html"
        );
    }

    #[test]
    fn test_class_page_file() {
        assert_eq!(class_page_file("FBModel"), "class_f_b_model.html");
        assert_eq!(class_page_file("FBCamera"), "class_f_b_camera.html");
        assert_eq!(
            class_page_file("FBPropertyListModel"),
            "class_f_b_property_list_model.html"
        );
    }

    #[test]
    fn test_cache_key_is_filesystem_safe() {
        let key = cache_key("https://example.com/a/b.html?q=1");
        assert!(
            key.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        );
        assert_eq!(key, cache_key("https://example.com/a/b.html?q=1"));
    }
}
