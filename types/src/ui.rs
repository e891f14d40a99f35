/// Rendering preferences shared by the host and the terminal UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    /// Skip passage transition effects and animated indicators.
    pub reduced_motion: bool,
}
