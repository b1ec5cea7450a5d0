//! Source lint: key hints like `[N]` must be clickable.
//!
//! A `render.rs` that shows bracket-key text through a plain `push(` call
//! draws a button that ignores taps. Such lines have to go through
//! `push_clickable()` so the row is registered as a click target.

use std::fs;
use std::path::Path;

/// `[X]` where X is one key character.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || b"+-<>=!~|\\".contains(&w[1]))
    })
}

/// `(line_number, line)` for every non-clickable push showing a key hint.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("//")
                && contains_bracket_key(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

fn visit_render_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            visit_render_files(&path, violations);
        } else if path.file_name().is_some_and(|n| n == "render.rs") {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            for (line_num, line) in find_bracket_key_in_push(&source) {
                violations.push((path.display().to_string(), line_num, line));
            }
        }
    }
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut violations = Vec::new();
    visit_render_files(&src, &mut violations);

    if !violations.is_empty() {
        let mut msg = String::from("key hints rendered without a click target:\n");
        for (file, line_num, line) in &violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

#[test]
fn renderer_is_scanned() {
    let render = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/psych/render.rs");
    assert!(render.exists());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_plain_push() {
        let source = r#"cl.push(Line::from(" [N] Add Neurons"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [F] Buy Factory"), BUY_FACTORY);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [E] Buy Food"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn reports_line_numbers() {
        let source = "let a = 1;\ncl.push(Line::from(\"[+] Dopamine\"));\n";
        assert_eq!(find_bracket_key_in_push(source)[0].0, 2);
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[N]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[<]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[NN]"));
        assert!(!contains_bracket_key("[{}]"));
        assert!(!contains_bracket_key("ab"));
    }
}
