//! Column definitions.

use std::fmt;

use super::cell::{CellValue, Renderable};

/// Id of the synthetic selection column the table prepends.
pub const SELECT_COLUMN_ID: &str = "select";

/// Conventional id of the per-row action buttons column.
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// Column header content.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    Text(String),
    Rendered(Renderable),
}

impl Header {
    /// Header text, if any can be derived.
    pub fn text(&self) -> Option<String> {
        match self {
            Header::Text(text) => Some(text.clone()),
            Header::Rendered(node) => node.text_content(),
        }
    }
}

impl From<&str> for Header {
    fn from(text: &str) -> Self {
        Header::Text(text.to_string())
    }
}

impl From<String> for Header {
    fn from(text: String) -> Self {
        Header::Text(text)
    }
}

impl From<Renderable> for Header {
    fn from(node: Renderable) -> Self {
        Header::Rendered(node)
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> CellValue>;

/// One column of a [`TableDef`](super::TableDef).
pub struct Column<T> {
    id: String,
    header: Header,
    accessor: Accessor<T>,
    sortable: bool,
    hideable: bool,
    exportable: bool,
}

impl<T> Column<T> {
    /// Data column. Sortable, hideable and exportable unless switched off.
    pub fn new<F, V>(id: impl Into<String>, header: impl Into<Header>, accessor: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: Into<CellValue>,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Box::new(move |row| accessor(row).into()),
            sortable: true,
            hideable: true,
            exportable: true,
        }
    }

    /// Non-data column rendering per-row controls. Never sorted or exported.
    pub fn actions<F>(render: F) -> Self
    where
        F: Fn(&T) -> Renderable + 'static,
    {
        Self {
            id: ACTIONS_COLUMN_ID.to_string(),
            header: Header::Text(String::new()),
            accessor: Box::new(move |row| CellValue::Renderable(render(row))),
            sortable: false,
            hideable: false,
            exportable: false,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }

    pub fn exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Header text, falling back to the column id.
    pub fn label(&self) -> String {
        self.header
            .text()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.id.clone())
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    /// Whether the column carries data for export. `actions` columns never do.
    pub fn is_exportable(&self) -> bool {
        self.exportable && self.id != ACTIONS_COLUMN_ID && self.id != SELECT_COLUMN_ID
    }

    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("exportable", &self.exportable)
            .finish_non_exhaustive()
    }
}
