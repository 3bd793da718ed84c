#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing goes into the focused pane: the editor or the search box.
    Insert,
}
