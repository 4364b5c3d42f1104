use std::fmt;

/// Task classification applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    GrammarCorrection,
    CodeHelp,
    Summarization,
    GeneralQuestion,
    #[default]
    Auto,
}

impl Category {
    pub const FIXED: [Category; 4] = [
        Category::GrammarCorrection,
        Category::CodeHelp,
        Category::Summarization,
        Category::GeneralQuestion,
    ];

    /// Lenient parse: case and `-`/space separators are ignored. Anything
    /// unrecognized resolves to [`Category::Auto`].
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "grammar_correction" => Self::GrammarCorrection,
            "code_help" => Self::CodeHelp,
            "summarization" => Self::Summarization,
            "general_question" => Self::GeneralQuestion,
            _ => Self::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrammarCorrection => "grammar_correction",
            Self::CodeHelp => "code_help",
            Self::Summarization => "summarization",
            Self::GeneralQuestion => "general_question",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
