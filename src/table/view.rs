//! Render models for the table's toolbar, header, body and pagination footer.

use super::{CellValue, CheckState, DataTable, Header, SortDirection, SELECT_COLUMN_ID};

/// Visibility switch for one hideable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub id: String,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarModel {
    /// Present when the table has a default filter column
    pub filter_placeholder: Option<String>,
    pub filter_value: String,
    pub column_toggles: Vec<ColumnToggle>,
    pub can_export: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderCell {
    /// Select-all checkbox for the current page
    Select { state: CheckState },
    Column {
        id: String,
        header: Header,
        label: String,
        sortable: bool,
        sort: Option<SortDirection>,
    },
}

impl HeaderCell {
    pub fn id(&self) -> &str {
        match self {
            HeaderCell::Select { .. } => SELECT_COLUMN_ID,
            HeaderCell::Column { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    pub id: String,
    pub selected: bool,
    /// One cell per visible column
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub selected_count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
}

impl<T> DataTable<'_, T> {
    pub fn toolbar(&self) -> ToolbarModel {
        let filter_placeholder = self
            .def()
            .options()
            .filter_columns
            .first()
            .and_then(|id| self.def().column(id))
            .map(|c| format!("Filter {}...", c.label().to_lowercase()));

        let column_toggles = self
            .def()
            .columns()
            .iter()
            .filter(|c| c.is_hideable())
            .map(|c| ColumnToggle {
                id: c.id().to_string(),
                label: c.label(),
                visible: self.is_column_visible(c.id()),
            })
            .collect();

        ToolbarModel {
            filter_placeholder,
            filter_value: self.filter().to_string(),
            column_toggles,
            can_export: self.can_export(),
        }
    }

    /// Select checkbox first, then the visible columns.
    pub fn header(&self) -> Vec<HeaderCell> {
        let mut cells = vec![HeaderCell::Select {
            state: self.page_selection(),
        }];
        cells.extend(self.visible_columns().into_iter().map(|c| HeaderCell::Column {
            id: c.id().to_string(),
            header: c.header().clone(),
            label: c.label(),
            sortable: c.is_sortable(),
            sort: self.state().sort_direction(c.id()),
        }));
        cells
    }

    /// Rows of the current page. Empty when there is nothing to show.
    pub fn body(&self) -> Vec<BodyRow> {
        let columns = self.visible_columns();
        self.page_rows()
            .into_iter()
            .map(|row| BodyRow {
                cells: columns.iter().map(|c| self.cell(&row, c)).collect(),
                id: row.id,
                selected: row.selected,
            })
            .collect()
    }

    pub fn pagination(&self) -> PaginationModel {
        PaginationModel {
            page_index: self.page_index(),
            page_count: self.page_count(),
            page_size: self.page_size(),
            can_previous: self.can_previous_page(),
            can_next: self.can_next_page(),
            selected_count: self.selected_count(),
            filtered_count: self.filtered_count(),
            total_count: self.total_count(),
        }
    }

    /// Current page as an aligned text grid, for terminals and logs.
    pub fn render_text(&self) -> String {
        let header = self.header();
        let body = self.body();

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(body.len() + 1);
        grid.push(
            header
                .iter()
                .map(|cell| match cell {
                    HeaderCell::Select { state } => checkbox(*state).to_string(),
                    HeaderCell::Column { label, sort, .. } => match sort {
                        Some(SortDirection::Asc) => format!("{} ^", label),
                        Some(SortDirection::Desc) => format!("{} v", label),
                        None => label.clone(),
                    },
                })
                .collect(),
        );
        for row in &body {
            let mut line = vec![checkbox(if row.selected {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            })
            .to_string()];
            line.extend(row.cells.iter().map(|c| c.to_text().replace('\n', " ")));
            grid.push(line);
        }

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                grid.iter()
                    .map(|line| line[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for line in &grid {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:<width$}", text, width = *width))
                .collect();
            out.push_str(padded.join(" | ").trim_end());
            out.push('\n');
        }
        if body.is_empty() {
            out.push_str("No results.\n");
        }

        let footer = self.pagination();
        out.push_str(&format!(
            "Page {} of {} | {} of {} row(s) selected",
            footer.page_index + 1,
            footer.page_count,
            footer.selected_count,
            footer.filtered_count
        ));
        out
    }
}

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

#[cfg(test)]
mod tests {
    use crate::table::{Column, Renderable, TableDef, TableOptions, TableState};

    use super::*;

    struct Member {
        id: u32,
        name: &'static str,
        active: bool,
    }

    fn def() -> TableDef<Member> {
        TableDef::new(
            vec![
                Column::new("name", "Name", |m: &Member| m.name),
                Column::new("active", "Active", |m: &Member| {
                    Renderable::labelled("badge", if m.active { "Active" } else { "Inactive" })
                }),
                Column::actions(|m: &Member| {
                    Renderable::labelled("button", "Edit").prop("memberId", m.id)
                }),
            ],
            TableOptions::default().page_size(2).filter_on("name"),
        )
        .unwrap()
        .with_row_id(|m: &Member| m.id.to_string())
    }

    fn data() -> Vec<Member> {
        vec![
            Member { id: 1, name: "Ana", active: true },
            Member { id: 2, name: "Ben", active: false },
            Member { id: 3, name: "Cleo", active: true },
        ]
    }

    #[test]
    fn test_toolbar() {
        let def = def();
        let data = data();
        let mut state = TableState::new();
        let mut table = DataTable::new(&def, &mut state, &data);
        table.set_filter("A");
        table.toggle_column_visibility("active");

        let toolbar = table.toolbar();
        assert_eq!(toolbar.filter_placeholder.as_deref(), Some("Filter name..."));
        assert_eq!(toolbar.filter_value, "A");
        assert_eq!(
            toolbar.column_toggles,
            vec![
                ColumnToggle { id: "name".into(), label: "Name".into(), visible: true },
                ColumnToggle { id: "active".into(), label: "Active".into(), visible: false },
            ]
        );
        assert!(!toolbar.can_export);
    }

    #[test]
    fn test_header_starts_with_select() {
        let def = def();
        let data = data();
        let mut state = TableState::new();
        let mut table = DataTable::new(&def, &mut state, &data);
        table.toggle_sort("name");

        let header = table.header();
        let ids: Vec<&str> = header.iter().map(HeaderCell::id).collect();
        assert_eq!(ids, vec!["select", "name", "active", "actions"]);
        match &header[1] {
            HeaderCell::Column { sort, sortable, .. } => {
                assert!(*sortable);
                assert_eq!(*sort, Some(SortDirection::Asc));
            }
            other => panic!("unexpected header cell {:?}", other),
        }
    }

    #[test]
    fn test_body_and_pagination() {
        let def = def();
        let data = data();
        let mut state = TableState::new();
        let mut table = DataTable::new(&def, &mut state, &data);
        table.set_row_selected("2", true);

        let body = table.body();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].id, "2");
        assert!(body[1].selected);
        assert_eq!(body[1].cells[1].to_text(), "Inactive");

        let footer = table.pagination();
        assert_eq!(footer.page_count, 2);
        assert!(footer.can_next && !footer.can_previous);
        assert_eq!(footer.selected_count, 1);
        assert_eq!(footer.total_count, 3);
    }

    #[test]
    fn test_render_text() {
        let def = def();
        let data = data();
        let mut state = TableState::new();
        let mut table = DataTable::new(&def, &mut state, &data);
        table.toggle_column_visibility("active");
        table.set_row_selected("1", true);

        let text = table.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[-] | Name | actions");
        assert_eq!(lines[1], "[x] | Ana  | Edit");
        assert_eq!(lines[2], "[ ] | Ben  | Edit");
        assert_eq!(lines[3], "Page 1 of 2 | 1 of 3 row(s) selected");

        table.set_filter("Zed");
        assert!(table.render_text().contains("No results."));
    }
}
