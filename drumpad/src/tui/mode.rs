use super::grid::GridLayout;

// state local to the tui; the layout from the last draw is what mouse
// clicks get resolved against
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub grid: GridLayout,
}
