/// Which column is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Vendor,
    Date,
    Total,
    Tax,
    /// When the record entered the ledger
    #[default]
    Added,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Ascending => " \u{25B2}",
            SortOrder::Descending => " \u{25BC}",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Table display state. Newest-first by Added is the ledger's default view.
pub struct TableState {
    pub selected: Option<usize>,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            sort_column: SortColumn::Added,
            sort_order: SortOrder::Descending,
        }
    }
}

impl TableState {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// A header click: same column toggles the order, a new column starts
    /// ascending.
    pub fn sort_clicked(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Ascending;
        }
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_newest_first() {
        let state = TableState::default();
        assert_eq!(state.sort_column, SortColumn::Added);
        assert_eq!(state.sort_order, SortOrder::Descending);
    }

    #[test]
    fn same_column_click_toggles_order() {
        let mut state = TableState::default();
        state.sort_clicked(SortColumn::Added);
        assert_eq!(state.sort_order, SortOrder::Ascending);
        state.sort_clicked(SortColumn::Added);
        assert_eq!(state.sort_order, SortOrder::Descending);
    }

    #[test]
    fn new_column_click_starts_ascending_and_drops_selection() {
        let mut state = TableState::default();
        state.selected = Some(3);
        state.sort_clicked(SortColumn::Total);
        assert_eq!(state.sort_column, SortColumn::Total);
        assert_eq!(state.sort_order, SortOrder::Ascending);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn keyboard_navigation_clamps_to_bounds() {
        let mut state = TableState::default();
        state.select_next(2);
        state.select_next(2);
        state.select_next(2);
        assert_eq!(state.selected, Some(1));
        state.select_prev();
        state.select_prev();
        assert_eq!(state.selected, Some(0));
    }
}
