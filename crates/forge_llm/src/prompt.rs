//! Prompt formatting for fresh builds and refinements.
//!
//! Pure functions: no I/O, no state.

/// Identity the model is asked to adopt.
const SYSTEM_ROLE: &str = "You are Forge.AI, an elite frontend engineer.";

/// Output rules shared by every request.
const OUTPUT_RULES: &[&str] = &[
    "Output ONLY valid HTML code.",
    "DO NOT include markdown fences (like ```html).",
    "DO NOT include explanatory text before or after the code.",
    "MUST include <script src=\"https://cdn.tailwindcss.com\"></script> in <head>.",
    "MUST include <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css\"> in <head>.",
    "Design Philosophy: Modern, Clean, Mobile-First, Interactive.",
    "All JavaScript MUST be contained within <script> tags.",
    "All CSS MUST be contained within <style> tags.",
    "Use standard HTML5 semantic elements.",
    "If the user asks for complex functionality (e.g. 3D), use a CDN link for Three.js.",
];

/// Marker that separates the instructions from the code being modified.
pub const EXISTING_CODE_MARKER: &str = "--- EXISTING CODE ---";

/// Build the full instruction payload sent to the model.
///
/// With `prior_code` the request is framed as a modification of exactly
/// that document; without it, as a fresh single-file build.
pub fn format_prompt(instruction: &str, prior_code: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(SYSTEM_ROLE);
    out.push_str("\n\n");

    match prior_code {
        Some(_) => {
            out.push_str("TASK: MODIFY the existing HTML application based on the user's request.\n");
            out.push_str("CONSTRAINTS:\n");
            out.push_str(&format!("1. User Request: \"{}\"\n", instruction));
            out.push_str("2. EXISTING CODE context is provided below.\n");
            out.push_str("3. RETURN THE FULLY ASSEMBLED, SINGLE HTML FILE. Do not return diffs.\n");
            out.push_str("4. Maintain existing features unless asked to remove them.\n");
        }
        None => {
            out.push_str(&format!(
                "TASK: Build a SINGLE-FILE, SELF-CONTAINED HTML application based on: \"{}\"\n",
                instruction
            ));
        }
    }

    out.push_str("\nSTRICT OUTPUT RULES:\n");
    for (i, rule) in OUTPUT_RULES.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rule));
    }
    let critical = if prior_code.is_some() {
        "CRITICAL: Keep existing functionality working. Only apply requested changes."
    } else {
        "CRITICAL: The app must be fully functional immediately."
    };
    out.push_str(&format!("{}. {}\n", OUTPUT_RULES.len() + 1, critical));

    if let Some(code) = prior_code {
        out.push('\n');
        out.push_str(EXISTING_CODE_MARKER);
        out.push('\n');
        out.push_str(code);
    }

    out
}
