//! Roles and the data a model returns for them.

/// What a view is asking a cell for.
///
/// [`BlockModel`](super::BlockModel) answers [`ItemRole::Display`] only; every
/// other role yields [`ItemData::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// The cell's text.
    Display,
    /// The value offered to an editor.
    Edit,
    /// Hover text.
    ToolTip,
    /// Front-end specific role `User(n)`.
    User(u32),
}

impl ItemRole {
    /// Numeric role value: display 0, edit 2, tooltip 3, user roles from 256.
    pub fn value(self) -> u32 {
        match self {
            ItemRole::Display => 0,
            ItemRole::Edit => 2,
            ItemRole::ToolTip => 3,
            ItemRole::User(n) => 256 + n,
        }
    }
}

/// The answer to a [`data`](super::ItemModel::data) query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    /// The cell has nothing for this role.
    #[default]
    None,
    /// Text content.
    Text(String),
    /// Integer content, as supplied by an editor.
    Int(i64),
    /// Boolean content, as supplied by an editor.
    Bool(bool),
}

impl ItemData {
    /// Returns `true` for [`ItemData::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    /// Borrows the text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Takes the text content, if any.
    pub fn into_text(self) -> Option<String> {
        match self {
            ItemData::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<String> for ItemData {
    fn from(text: String) -> Self {
        ItemData::Text(text)
    }
}

impl From<&str> for ItemData {
    fn from(text: &str) -> Self {
        ItemData::Text(text.to_owned())
    }
}

impl From<Option<String>> for ItemData {
    fn from(text: Option<String>) -> Self {
        text.map_or(ItemData::None, ItemData::Text)
    }
}

impl From<i64> for ItemData {
    fn from(n: i64) -> Self {
        ItemData::Int(n)
    }
}

impl From<bool> for ItemData {
    fn from(b: bool) -> Self {
        ItemData::Bool(b)
    }
}
