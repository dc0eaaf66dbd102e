//! Change highlighting between the current and previous rendering.

/// One rendered word split at the first character that changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Highlight {
    /// Leading characters identical to the previous rendering.
    pub unchanged: String,
    /// Trailing characters that differ. The whole word when no previous
    /// rendering exists.
    pub changed: String,
}

impl Highlight {
    /// The full rendered word.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}{}", self.unchanged, self.changed)
    }
}

/// Splits `current` at the first character where it differs from `previous`.
///
/// The scan is over rendered characters, not numeric values, and the split
/// stays on a character boundary. With no previous rendering the entire
/// string counts as changed; identical strings leave the changed suffix
/// empty.
#[must_use]
pub fn highlight(current: &str, previous: Option<&str>) -> Highlight {
    let Some(previous) = previous else {
        return Highlight {
            unchanged: String::new(),
            changed: current.to_string(),
        };
    };

    let mut split = current.len();
    let mut previous_chars = previous.chars();
    for (index, c) in current.char_indices() {
        match previous_chars.next() {
            Some(p) if p == c => {}
            _ => {
                split = index;
                break;
            }
        }
    }

    Highlight {
        unchanged: current[..split].to_string(),
        changed: current[split..].to_string(),
    }
}

/// Splits each word of a chopped rendering against the word at the same
/// position in the previous rendering. Positions the previous rendering
/// does not have count as having no previous value.
#[must_use]
pub fn highlight_words(current: &[String], previous: Option<&[String]>) -> Vec<Highlight> {
    current
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let before = previous
                .and_then(|words| words.get(index))
                .map(String::as_str);
            highlight(word, before)
        })
        .collect()
}
