//! Generation form state and derivation rules

use crate::types::{
    snap_dimension, DimensionPreset, GenerationParams, MAX_PROMPT_LEN, MIN_PROMPT_LEN,
};

/// How the form's width/height are currently driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionChoice {
    /// A named preset; its literal values overwrite width/height on selection
    Named(&'static DimensionPreset),
    /// Width and height are edited directly, snapped to the 16-pixel grid
    Custom,
}

/// Live state behind the generation form
///
/// Owns the [`GenerationParams`] being edited plus the derived UI state
/// around it. All derivation rules live here; the client trusts the params
/// it is handed except for dimension snapping, which it re-applies.
#[derive(Debug)]
pub struct FormState {
    params: GenerationParams,
    choice: DimensionChoice,
    show_advanced: bool,
}

impl FormState {
    /// Fresh form: empty prompt, default style, 1024x1024 square preset
    pub fn new() -> Self {
        Self {
            params: GenerationParams::default(),
            choice: DimensionChoice::Named(&crate::types::DIMENSION_PRESETS[0]),
            show_advanced: false,
        }
    }

    /// The parameters as currently edited
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Current dimension selection
    pub fn dimension_choice(&self) -> DimensionChoice {
        self.choice
    }

    /// True when width/height are directly editable
    pub fn is_custom_dimensions(&self) -> bool {
        self.choice == DimensionChoice::Custom
    }

    /// Whether the advanced section is expanded
    pub fn show_advanced(&self) -> bool {
        self.show_advanced
    }

    pub fn toggle_advanced(&mut self) {
        self.show_advanced = !self.show_advanced;
    }

    // ============ Field edits ============

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.params.message = message.into();
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.params.style = style.into();
    }

    /// Set the number of images, clamped to 1..=4
    pub fn set_count(&mut self, n: u8) {
        self.params.n = n.clamp(1, 4);
    }

    /// Set the diffusion steps, clamped to 1..=4
    pub fn set_steps(&mut self, steps: u8) {
        self.params.steps = steps.clamp(1, 4);
    }

    pub fn set_seed(&mut self, seed: impl Into<String>) {
        self.params.seed = Some(seed.into());
    }

    pub fn set_negative_prompt(&mut self, negative_prompt: impl Into<String>) {
        self.params.negative_prompt = Some(negative_prompt.into());
    }

    pub fn set_enhance(&mut self, enhance: bool) {
        self.params.enhance = enhance;
    }

    /// Set the width; snapped to the nearest multiple of 16, then clamped
    pub fn set_width(&mut self, px: u32) {
        self.params.width = snap_dimension(px);
    }

    /// Set the height; snapped to the nearest multiple of 16, then clamped
    pub fn set_height(&mut self, px: u32) {
        self.params.height = snap_dimension(px);
    }

    /// Select how dimensions are driven
    ///
    /// A named preset overwrites width/height with its literal values,
    /// discarding any prior custom edits. `Custom` keeps the current values
    /// and opens them for direct editing.
    pub fn choose_dimensions(&mut self, choice: DimensionChoice) {
        if let DimensionChoice::Named(preset) = choice {
            self.params.width = preset.width;
            self.params.height = preset.height;
        }
        self.choice = choice;
    }

    // ============ Submission ============

    /// True when the prompt length is within 3..=1000 characters
    pub fn can_submit(&self) -> bool {
        let len = self.params.message.chars().count();
        (MIN_PROMPT_LEN..=MAX_PROMPT_LEN).contains(&len)
    }

    /// Hand out the parameters for submission
    ///
    /// Returns `None` when the gate is closed; an invalid form is a no-op,
    /// not an error.
    pub fn submit(&self) -> Option<GenerationParams> {
        if self.can_submit() {
            Some(self.params.clone())
        } else {
            None
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
