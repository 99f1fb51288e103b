use crate::model::Mode;

/// Prompt asking the model for an [`AnalysisResult`](crate::model::AnalysisResult).
///
/// Loaded from `analyze_prompt.txt` at compile time. Contains a
/// `{{COMPOSITION}}` placeholder replaced by [`build_prompt`].
pub const ANALYZE_PROMPT: &str = include_str!("analyze_prompt.txt");

/// Prompt asking the model for a [`RecipeSet`](crate::model::RecipeSet).
pub const RECIPES_PROMPT: &str = include_str!("recipes_prompt.txt");

const COMPOSITION_PLACEHOLDER: &str = "{{COMPOSITION}}";

fn template(mode: Mode) -> &'static str {
    match mode {
        Mode::Analyze => ANALYZE_PROMPT,
        Mode::Recipes => RECIPES_PROMPT,
    }
}

/// Build the prompt for `mode`, inserting the composition text verbatim.
///
/// The text is not escaped. It is the last thing in the template, so it
/// cannot change the instructions that precede it.
pub fn build_prompt(mode: Mode, composition: &str) -> String {
    template(mode).replace(COMPOSITION_PLACEHOLDER, composition.trim())
}
