//! Instruction prompts sent to the model.

use crate::category::Category;

pub const GRAMMAR_TASK: &str = "Correct the grammar, spelling and punctuation of the text below. \
Reply with the corrected text, then a short bullet list of the changes you made.";

pub const CODE_TASK: &str = "Help with the programming request below. Explain the problem, \
then give a working solution. Wrap any code in a markdown code block tagged with its language \
(for example ```python).";

pub const SUMMARY_TASK: &str = "Summarize the text below in a few sentences, keeping only the key points.";

pub const QUESTION_TASK: &str = "Answer the question below clearly and accurately.";

const AUTO_TASK: &str = "Decide which one of these modes fits the input below best: \
grammar_correction, code_help, summarization, general_question.\n\
The first line of your reply must be exactly [mode:<mode>] with the mode you chose. \
No other text may come before that line.\n\
After it, respond to the input the way that mode requires.";

/// Builds the free-text instruction for `category`. The user text is
/// embedded verbatim.
pub fn build_prompt(category: Category, text: &str) -> String {
    let task = match category {
        Category::GrammarCorrection => GRAMMAR_TASK,
        Category::CodeHelp => CODE_TASK,
        Category::Summarization => SUMMARY_TASK,
        Category::GeneralQuestion => QUESTION_TASK,
        Category::Auto => AUTO_TASK,
    };

    format!("{task}\n\nUser input:\n{text}")
}

/// Prompt for the schema-constrained variant, where the model returns
/// `{"category", "answer"}`.
pub fn build_classification_prompt(text: &str) -> String {
    format!(
        "Classify the following user input into one of these categories:\n\
         - Grammar Correction\n\
         - Code Help\n\
         - Summarization\n\
         - General Question\n\n\
         Then give the improved, solved or final response accordingly. If the response \
         is code, wrap it in a markdown code block (e.g. ```python\\n...code...\\n```).\n\n\
         User Input: {text}"
    )
}
