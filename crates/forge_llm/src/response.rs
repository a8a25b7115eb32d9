//! Post-processing of raw model output.

use regex::Regex;

use crate::error::{GenerationError, GenerationResult};

/// Remove markdown fences the model may wrap around the document.
pub fn strip_fences(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    if let Ok(re) = Regex::new(r"(?i)^```(?:html)?") {
        text = re.replace(&text, "").into_owned();
    }
    if let Ok(re) = Regex::new(r"```$") {
        text = re.replace(text.trim_end(), "").into_owned();
    }
    text.trim().to_string()
}

/// Whether the text carries both an opening and closing root tag.
pub fn has_root_document(text: &str) -> bool {
    text.contains("<html") && text.contains("</html>")
}

/// Clean model output and check it is a complete HTML document.
pub fn clean_html(raw: &str) -> GenerationResult<String> {
    if raw.trim().is_empty() {
        return Err(GenerationError::InvalidResponse(
            "Model returned an empty response.".to_string(),
        ));
    }

    let cleaned = strip_fences(raw);
    if !has_root_document(&cleaned) {
        return Err(GenerationError::InvalidResponse(
            "Generated content is not valid HTML.".to_string(),
        ));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<html><head></head><body>ok</body></html>";

    #[test]
    fn test_plain_document_passes_through() {
        assert_eq!(clean_html(DOC).unwrap(), DOC);
    }

    #[test]
    fn test_html_fence_stripped() {
        let raw = format!("```html\n{}\n```", DOC);
        assert_eq!(clean_html(&raw).unwrap(), DOC);
    }

    #[test]
    fn test_uppercase_and_bare_fences_stripped() {
        assert_eq!(clean_html(&format!("```HTML\n{}```", DOC)).unwrap(), DOC);
        assert_eq!(clean_html(&format!("```\n{}\n```\n", DOC)).unwrap(), DOC);
    }

    #[test]
    fn test_inner_backticks_kept() {
        let doc = "<html><body><code>```</code></body></html>";
        assert_eq!(clean_html(doc).unwrap(), doc);
    }

    #[test]
    fn test_missing_root_tags_rejected() {
        let err = clean_html("<div>hello</div>").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));

        let err = clean_html("<html><body>unterminated").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[test]
    fn test_empty_rejected() {
        let err = clean_html("  \n ").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
