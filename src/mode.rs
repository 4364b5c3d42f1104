use crate::category::Category;

/// Label reported when auto-mode output carries no usable tag.
pub const FALLBACK_MODE: &str = "general";

const TAG_OPEN: &str = "[mode:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub detected: Option<String>,
    pub text: String,
}

/// Splits the `[mode:<label>]` tag off auto-mode output.
///
/// Non-auto requests pass through untouched with no detected mode. A missing
/// or malformed tag yields [`FALLBACK_MODE`] and the original text.
pub fn detect_mode(raw: &str, requested: Category) -> Detection {
    if requested != Category::Auto {
        return Detection {
            detected: None,
            text: raw.to_string(),
        };
    }

    match split_tag(raw.trim_start()) {
        Some((label, rest)) => Detection {
            detected: Some(label.to_string()),
            text: rest.trim().to_string(),
        },
        None => Detection {
            detected: Some(FALLBACK_MODE.to_string()),
            text: raw.to_string(),
        },
    }
}

/// The whole first line belongs to the tag; anything after `]` on that line
/// is dropped.
fn split_tag(text: &str) -> Option<(&str, &str)> {
    let (first_line, remainder) = text.split_once('\n').unwrap_or((text, ""));
    let (label, _) = first_line.strip_prefix(TAG_OPEN)?.split_once(']')?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    Some((label, remainder))
}
