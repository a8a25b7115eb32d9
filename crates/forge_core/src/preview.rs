//! Host page for previewing an artifact in a sandboxed frame.

use crate::view::ViewState;

/// Capabilities granted to the generated document. Top navigation is
/// deliberately absent.
pub const SANDBOX_PERMISSIONS: &str =
    "allow-scripts allow-modals allow-forms allow-popups allow-same-origin";

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a standalone page embedding `code` as the frame's whole document.
pub fn render_host_page(code: &str, view: &ViewState) -> String {
    let frame_style = match view.frame_size() {
        Some((w, h)) => format!(
            "width:{}px;height:{}px;border:12px solid #111;border-radius:2rem;",
            w, h
        ),
        None => "width:100%;height:100vh;border:0;".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Forge preview (rev {rev})</title>
<style>
  body {{ margin:0; min-height:100vh; display:flex; align-items:center; justify-content:center; background:#f3f4f6; }}
  iframe {{ background:#fff; box-shadow:0 10px 30px rgba(0,0,0,.2); }}
</style>
</head>
<body>
<iframe title="preview" sandbox="{sandbox}" style="{style}" srcdoc="{doc}"></iframe>
</body>
</html>
"#,
        rev = view.preview_revision,
        sandbox = SANDBOX_PERMISSIONS,
        style = frame_style,
        doc = escape_attribute(code),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Device;

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_host_page_sandbox() {
        let page = render_host_page("<html><body>\"hi\"</body></html>", &ViewState::default());

        assert!(page.contains(&format!("sandbox=\"{}\"", SANDBOX_PERMISSIONS)));
        assert!(!page.contains("allow-top-navigation"));
        assert!(page.contains("srcdoc=\"&lt;html&gt;&lt;body&gt;&quot;hi&quot;"));
        assert!(page.contains("width:375px;height:667px"));
    }

    #[test]
    fn test_desktop_fills_window() {
        let view = ViewState {
            device: Device::Desktop,
            ..ViewState::default()
        };
        assert!(render_host_page("<html></html>", &view).contains("width:100%"));
    }
}
