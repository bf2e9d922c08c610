use std::path::{Path, PathBuf};

use promptsmith_contracts::collections::{FewShotExample, GeneratedImageData, Task};
use promptsmith_contracts::models::TargetModel;
use promptsmith_contracts::templates::PromptTemplate;
use similar::{ChangeTag, TextDiff};

const SHORT_ID_LEN: usize = 8;
const PREVIEW_CHARS: usize = 60;

pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map(|(index, _)| &id[..index])
        .unwrap_or(id)
}

pub(crate) fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        return single_line;
    }
    single_line.chars().take(PREVIEW_CHARS).collect::<String>() + "…"
}

pub(crate) fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {}  {}", short_id(&task.id), task.text)
}

pub(crate) fn example_lines(index: usize, example: &FewShotExample) -> Vec<String> {
    vec![
        format!("#{} {}", index + 1, short_id(&example.id)),
        format!("  input:  {}", preview(&example.input)),
        format!("  output: {}", preview(&example.output)),
    ]
}

pub(crate) fn image_line(image: &GeneratedImageData) -> String {
    let created = chrono::DateTime::from_timestamp_millis(image.timestamp)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| image.timestamp.to_string());
    format!(
        "{}  {:>4}  {}  {}",
        short_id(&image.id),
        image.aspect_ratio,
        created,
        preview(&image.prompt)
    )
}

pub(crate) fn template_line(index: usize, template: &PromptTemplate) -> String {
    format!(
        "{:>2}. {:<24} {}",
        index + 1,
        template.title,
        template.description
    )
}

pub(crate) fn model_line(model: TargetModel, selected: bool) -> String {
    let mark = if selected { "*" } else { " " };
    format!("[{mark}] {model}")
}

/// Word-level diff with `[-removed-]` and `{+added+}` markers.
pub(crate) fn word_diff(original: &str, optimized: &str) -> String {
    let diff = TextDiff::from_words(original, optimized);
    let mut rendered = String::new();
    let mut open = ChangeTag::Equal;
    for change in diff.iter_all_changes() {
        let tag = change.tag();
        if tag != open {
            rendered.push_str(closing_marker(open));
            rendered.push_str(opening_marker(tag));
            open = tag;
        }
        rendered.push_str(change.value());
    }
    rendered.push_str(closing_marker(open));
    rendered
}

fn opening_marker(tag: ChangeTag) -> &'static str {
    match tag {
        ChangeTag::Equal => "",
        ChangeTag::Delete => "[-",
        ChangeTag::Insert => "{+",
    }
}

fn closing_marker(tag: ChangeTag) -> &'static str {
    match tag {
        ChangeTag::Equal => "",
        ChangeTag::Delete => "-]",
        ChangeTag::Insert => "+}",
    }
}

/// Sniffs the image format from its bytes, falling back to the file extension.
pub(crate) fn image_mime(path: &Path, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" | "heif" => "image/heic",
        _ => "image/png",
    }
}

/// Appends the detected format's extension when `path` has none.
pub(crate) fn export_path(path: &Path, bytes: &[u8]) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let ext = image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg");
    path.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use promptsmith_contracts::collections::Task;

    use super::{export_path, image_mime, preview, short_id, task_line, word_diff};

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn short_ids_keep_eight_chars() {
        assert_eq!(short_id("0f8d2c1e-aaaa-bbbb"), "0f8d2c1e");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("line one\n  line two"), "line one line two");
        let long = "word ".repeat(30);
        assert!(preview(&long).ends_with('…'));
    }

    #[test]
    fn task_line_marks_completion() {
        let task = Task {
            id: "12345678-9".to_string(),
            text: "Ship it".to_string(),
            completed: true,
        };
        assert_eq!(task_line(&task), "[x] 12345678  Ship it");
    }

    #[test]
    fn word_diff_marks_changes() {
        assert_eq!(
            word_diff("explain recursion", "explain recursion simply"),
            "explain recursion{+ simply+}"
        );
        assert_eq!(word_diff("a cat", "a dog"), "a [-cat-]{+dog+}");
    }

    #[test]
    fn mime_prefers_magic_bytes_over_extension() {
        assert_eq!(image_mime(Path::new("photo.jpg"), PNG_MAGIC), "image/png");
        assert_eq!(image_mime(Path::new("photo.JPEG"), b"???"), "image/jpeg");
        assert_eq!(image_mime(Path::new("photo"), b"???"), "image/png");
    }

    #[test]
    fn export_path_adds_detected_extension() {
        assert_eq!(
            export_path(Path::new("out/fox"), PNG_MAGIC),
            Path::new("out/fox.png")
        );
        assert_eq!(
            export_path(Path::new("out/fox.jpeg"), PNG_MAGIC),
            Path::new("out/fox.jpeg")
        );
        assert_eq!(export_path(Path::new("fox"), b"???"), Path::new("fox.jpg"));
    }
}
