/// The context every cursor operation runs against: the text model, its view
/// projection, and the movement configuration.
use anyhow::Result;
use caret_config::EditorConfig;

use crate::model::TextModel;
use crate::position::{Position, Range};
use crate::view::{CoordinatesConverter, ViewLayout, ViewModel, ViewOptions};
use crate::word::WordClassifier;

/// Movement settings used by the cursor primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorConfig {
    pub tab_size: usize,
    pub page_size: usize,
    pub word_classifier: WordClassifier,
    pub select_all_toggles_editable_range: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for CursorConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            tab_size: config.tab_size.max(1),
            page_size: config.page_size.max(1),
            word_classifier: WordClassifier::new(&config.word_separators),
            select_all_toggles_editable_range: config.select_all_toggles_editable_range,
        }
    }
}

/// Borrowed bundle of model, view layout, and configuration.
///
/// Queries never cache: each one builds a fresh [`ViewModel`] over the
/// current model and layout. The layout must be rebuilt by the owner after
/// the model is edited.
pub struct CursorContext<'a> {
    model: &'a mut TextModel,
    layout: &'a ViewLayout,
    config: &'a CursorConfig,
}

impl<'a> CursorContext<'a> {
    pub fn new(model: &'a mut TextModel, layout: &'a ViewLayout, config: &'a CursorConfig) -> Self {
        Self {
            model,
            layout,
            config,
        }
    }

    pub fn model(&self) -> &TextModel {
        &*self.model
    }

    /// Mutable access for marker bookkeeping and edits.
    pub fn model_mut(&mut self) -> &mut TextModel {
        self.model
    }

    pub fn layout(&self) -> &ViewLayout {
        self.layout
    }

    pub fn config(&self) -> &CursorConfig {
        self.config
    }

    /// The view-space projection of the model.
    pub fn view_model(&self) -> ViewModel<'_> {
        ViewModel::new(&*self.model, self.layout)
    }

    /// Converts a view position to the model, snapping invalid input.
    pub fn to_model_position(&self, view_position: Position) -> Position {
        self.view_model().view_to_model_position(view_position)
    }

    /// Converts a model position to the view, snapping invalid input.
    pub fn to_view_position(&self, model_position: Position) -> Position {
        self.view_model().model_to_view_position(model_position)
    }

    pub fn to_model_range(&self, view_range: Range) -> Range {
        self.view_model().view_to_model_range(view_range)
    }

    pub fn to_view_range(&self, model_range: Range) -> Range {
        self.view_model().model_to_view_range(model_range)
    }

    /// Clamps a model range to the document.
    pub fn validate_range(&self, range: Range) -> Range {
        self.model.validate_range(range)
    }

    pub fn validate_view_position(
        &self,
        view_position: Position,
        expected_model_position: Position,
    ) -> Position {
        self.view_model()
            .validate_view_position(view_position, expected_model_position)
    }

    pub fn validate_view_range(&self, view_range: Range, expected_model_range: Range) -> Range {
        self.view_model()
            .validate_view_range(view_range, expected_model_range)
    }

    /// Model range of the lines completely shown in the viewport.
    pub fn visible_range(&self) -> Range {
        self.view_model().completely_visible_model_range()
    }

    /// View range of the lines completely shown in the viewport.
    pub fn visible_view_range(&self) -> Range {
        self.view_model().completely_visible_view_range()
    }

    pub fn is_last_line_visible(&self) -> bool {
        self.view_model().is_last_line_visible()
    }
}

/// Owns a text model together with its view layout and configuration.
///
/// Edits go through [`EditorState::apply_edit`] so the layout is rebuilt
/// before the next [`CursorContext`] is handed out.
#[derive(Debug, Clone)]
pub struct EditorState {
    model: TextModel,
    options: ViewOptions,
    layout: ViewLayout,
    config: CursorConfig,
}

impl EditorState {
    pub fn new(model: TextModel, options: ViewOptions, config: CursorConfig) -> Self {
        let layout = ViewLayout::build(&model, &options);
        Self {
            model,
            options,
            layout,
            config,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(TextModel::from(text), ViewOptions::default(), CursorConfig::default())
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Borrows everything as a [`CursorContext`].
    pub fn context(&mut self) -> CursorContext<'_> {
        CursorContext::new(&mut self.model, &self.layout, &self.config)
    }

    pub fn set_viewport(&mut self, first_line: usize, height: usize) {
        self.layout.set_viewport(first_line, height);
    }

    pub fn set_editable_range(&mut self, range: Option<Range>) {
        self.model.set_editable_range(range);
    }

    /// Changes wrapping and folding, rebuilding the layout.
    pub fn set_view_options(&mut self, options: ViewOptions) {
        self.options = options;
        self.relayout();
    }

    /// Edits the model and rebuilds the layout, keeping the viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if the model rejects the edit.
    pub fn apply_edit(&mut self, range: Range, text: &str) -> Result<Range> {
        let inserted = self.model.apply_edit(range, text)?;
        self.relayout();
        Ok(inserted)
    }

    fn relayout(&mut self) {
        let viewport = self.layout.viewport();
        self.layout = ViewLayout::build(&self.model, &self.options);
        if let Some(vp) = viewport {
            self.layout.set_viewport(vp.first_line, vp.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_editor_config() {
        let mut editor = EditorConfig::default();
        editor.tab_size = 2;
        editor.page_size = 0;
        let config = CursorConfig::from(&editor);
        assert_eq!(config.tab_size, 2);
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn test_conversions_snap_out_of_range_input() {
        let mut model = TextModel::from("abcdefgh\nxy");
        let layout = ViewLayout::build(
            &model,
            &ViewOptions {
                wrapping_column: Some(4),
                folds: Vec::new(),
            },
        );
        let config = CursorConfig::default();
        let ctx = CursorContext::new(&mut model, &layout, &config);

        assert_eq!(ctx.to_view_position(Position::new(1, 6)), Position::new(2, 2));
        assert_eq!(ctx.to_model_position(Position::new(2, 2)), Position::new(1, 6));
        assert_eq!(ctx.to_model_position(Position::new(40, 40)), Position::new(2, 3));
        assert_eq!(ctx.validate_range(Range::new(0, 0, 9, 9)), Range::new(1, 1, 2, 3));
    }

    #[test]
    fn test_visible_ranges_follow_viewport() {
        let mut model = TextModel::from("a\nb\nc\nd");
        let layout = ViewLayout::build(&model, &ViewOptions::default()).with_viewport(2, 2);
        let config = CursorConfig::default();
        let ctx = CursorContext::new(&mut model, &layout, &config);
        assert_eq!(ctx.visible_view_range(), Range::new(2, 1, 3, 2));
        assert_eq!(ctx.visible_range(), Range::new(2, 1, 3, 2));
        assert!(!ctx.is_last_line_visible());
    }

    #[test]
    fn test_editor_state_relayouts_after_edit() {
        let mut editor = EditorState::new(
            TextModel::from("abcd"),
            ViewOptions {
                wrapping_column: Some(4),
                folds: Vec::new(),
            },
            CursorConfig::default(),
        );
        editor.set_viewport(1, 5);
        assert_eq!(editor.layout().view_line_count(), 1);
        editor
            .apply_edit(Range::collapsed(Position::new(1, 5)), "efgh")
            .unwrap();
        assert_eq!(editor.layout().view_line_count(), 2);
        assert!(editor.layout().viewport().is_some());
    }
}
