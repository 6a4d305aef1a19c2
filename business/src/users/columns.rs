use crate::table::Column;

pub const USER_COLUMNS: &[Column] = &[
    Column {
        id: "username",
        label: "Username",
    },
    Column {
        id: "role",
        label: "Role",
    },
    Column {
        id: "email",
        label: "Email",
    },
    Column {
        id: "quota",
        label: "Video quota",
    },
    Column {
        id: "createdAt",
        label: "Created",
    },
    Column {
        id: "quotaDaily",
        label: "Daily quota",
    },
    Column {
        id: "pluginAuth",
        label: "Auth plugin",
    },
    Column {
        id: "lastLoginDate",
        label: "Last login",
    },
];

/// Columns shown until the operator picks others.
pub const DEFAULT_VISIBLE_COLUMNS: &[&str] = &["username", "role", "email", "quota", "createdAt"];

/// Available columns plus the operator's visible subset, kept in column order.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: &'static [Column],
    visible: Vec<&'static str>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::new(USER_COLUMNS, DEFAULT_VISIBLE_COLUMNS)
    }
}

impl ColumnSet {
    pub fn new(columns: &'static [Column], visible: &[&str]) -> Self {
        let mut set = Self {
            columns,
            visible: Vec::new(),
        };
        set.set_visible(visible);
        set
    }

    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn get(&self, id: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(&id)
    }

    pub fn visible(&self) -> &[&'static str] {
        &self.visible
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.columns.iter().filter(|c| self.is_visible(c.id))
    }

    /// Unknown ids are ignored.
    pub fn set_visible(&mut self, ids: &[&str]) {
        self.visible = self
            .columns
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.id)
            .collect();
    }

    /// Flip one column. Returns the new visibility, `None` for unknown ids.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let column = self.get(id)?;
        let now_visible = !self.is_visible(column.id);
        let mut ids: Vec<&str> = self.visible.clone();
        if now_visible {
            ids.push(column.id);
        } else {
            ids.retain(|v| *v != column.id);
        }
        self.set_visible(&ids);
        Some(now_visible)
    }
}
