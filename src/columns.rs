//! Column registry and per-column behaviour flags.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coords::Coordinate;
use crate::error::{GridError, Result};
use crate::types::RowData;

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    String,
    /// Calendar date, pasted as `YYYY-MM-DD`.
    Date,
}

/// Inputs available to a computed column flag.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub coords: Coordinate,
    /// The row record, if the row exists.
    pub row: Option<&'a RowData>,
    pub column: &'a Column,
}

/// A closure deciding a flag from the cell it applies to.
pub type CellPredicate = Rc<dyn Fn(&CellContext<'_>) -> bool>;

/// A per-column flag that is either fixed or computed per cell.
#[derive(Clone)]
pub enum Predicate {
    Static(bool),
    Computed(CellPredicate),
}

impl Predicate {
    /// Wrap a closure.
    pub fn computed(f: impl Fn(&CellContext<'_>) -> bool + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    #[must_use]
    pub fn resolve(&self, ctx: &CellContext<'_>) -> bool {
        match self {
            Predicate::Static(value) => *value,
            Predicate::Computed(f) => f(ctx),
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::Static(false)
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        Self::Static(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Predicate::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Column-level paste validator. Returns `true` to accept the pasted text.
#[derive(Clone)]
pub struct PasteValidator(Rc<dyn Fn(&str) -> bool>);

impl PasteValidator {
    pub fn new(f: impl Fn(&str) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[must_use]
    pub fn check(&self, text: &str) -> bool {
        (self.0)(text)
    }
}

impl fmt::Debug for PasteValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasteValidator(..)")
    }
}

/// One grid column.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: String,
    /// Key of this column's value inside a [`RowData`] record.
    pub accessor: String,
    pub column_type: Option<ColumnType>,
    pub disable_navigation: Predicate,
    pub disable_backspace: Predicate,
    pub disable_cut: Predicate,
    pub disable_copy: Predicate,
    pub disable_paste: Predicate,
    pub validator: Option<PasteValidator>,
    /// Pasted text is truncated to this many characters.
    pub max_length: Option<usize>,
    /// Open the editor this many milliseconds after the cell is selected.
    pub delay_editor_open: Option<u32>,
}

impl Column {
    /// A column whose accessor is its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: id.clone(),
            id,
            column_type: None,
            disable_navigation: Predicate::default(),
            disable_backspace: Predicate::default(),
            disable_cut: Predicate::default(),
            disable_copy: Predicate::default(),
            disable_paste: Predicate::default(),
            validator: None,
            max_length: None,
            delay_editor_open: None,
        }
    }

    #[must_use]
    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = accessor.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    #[must_use]
    pub fn with_disable_navigation(mut self, flag: impl Into<Predicate>) -> Self {
        self.disable_navigation = flag.into();
        self
    }

    #[must_use]
    pub fn with_disable_backspace(mut self, flag: impl Into<Predicate>) -> Self {
        self.disable_backspace = flag.into();
        self
    }

    #[must_use]
    pub fn with_disable_cut(mut self, flag: impl Into<Predicate>) -> Self {
        self.disable_cut = flag.into();
        self
    }

    #[must_use]
    pub fn with_disable_copy(mut self, flag: impl Into<Predicate>) -> Self {
        self.disable_copy = flag.into();
        self
    }

    #[must_use]
    pub fn with_disable_paste(mut self, flag: impl Into<Predicate>) -> Self {
        self.disable_paste = flag.into();
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: PasteValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn with_delay_editor_open(mut self, delay_ms: u32) -> Self {
        self.delay_editor_open = Some(delay_ms);
        self
    }

    /// This column's value in `row`, if present.
    #[must_use]
    pub fn value<'r>(&self, row: &'r RowData) -> Option<&'r Value> {
        row.get(&self.accessor)
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        self.column_type == Some(ColumnType::Number)
    }
}

/// Ordered, id-unique list of columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    /// # Errors
    /// Returns [`GridError::DuplicateColumn`] if two columns share an id.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(GridError::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Column at a (possibly negative) coordinate index.
    #[must_use]
    pub fn get(&self, col_index: i32) -> Option<&Column> {
        usize::try_from(col_index)
            .ok()
            .and_then(|i| self.columns.get(i))
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Mutable access, for attaching computed flags or validators after
    /// building from configuration.
    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
