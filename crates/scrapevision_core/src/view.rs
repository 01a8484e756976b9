use crate::view_model::JobSnapshot;

/// Which derived view of the results the shell presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Table,
    StarHistogram,
    ConfidenceChart,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [
        ActiveView::Table,
        ActiveView::StarHistogram,
        ActiveView::ConfidenceChart,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ActiveView::Table => "Results",
            ActiveView::StarHistogram => "Star Rating Distribution",
            ActiveView::ConfidenceChart => "Average Confidence per Star Rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSelector {
    active: ActiveView,
}

impl ViewSelector {
    pub fn new(active: ActiveView) -> Self {
        Self { active }
    }

    pub fn set(&mut self, view: ActiveView) {
        self.active = view;
    }

    pub fn active(&self) -> ActiveView {
        self.active
    }

    /// Advance to the next view, wrapping around.
    pub fn cycle(&mut self) -> ActiveView {
        let position = ActiveView::ALL
            .iter()
            .position(|view| *view == self.active)
            .unwrap_or(0);
        self.active = ActiveView::ALL[(position + 1) % ActiveView::ALL.len()];
        self.active
    }

    /// The active view, or `None` while there are no results to show.
    pub fn active_for(&self, snapshot: &JobSnapshot) -> Option<ActiveView> {
        if snapshot.results.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_table_and_cycles() {
        let mut selector = ViewSelector::default();
        assert_eq!(selector.active(), ActiveView::Table);
        assert_eq!(selector.cycle(), ActiveView::StarHistogram);
        assert_eq!(selector.cycle(), ActiveView::ConfidenceChart);
        assert_eq!(selector.cycle(), ActiveView::Table);
    }

    #[test]
    fn set_replaces_active_view() {
        let mut selector = ViewSelector::new(ActiveView::Table);
        selector.set(ActiveView::ConfidenceChart);
        assert_eq!(selector.active(), ActiveView::ConfidenceChart);
    }

    #[test]
    fn nothing_active_without_results() {
        let selector = ViewSelector::new(ActiveView::StarHistogram);
        assert_eq!(selector.active_for(&JobSnapshot::default()), None);
    }
}
