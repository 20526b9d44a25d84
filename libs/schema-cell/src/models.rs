use serde::Serialize;

use shared_database::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    /// Engine-assigned surrogate key; doubles as the primary key.
    Serial,
    Int,
    VarChar(u16),
    Date,
    Time,
    Decimal { precision: u8, scale: u8 },
}

impl ColumnType {
    pub fn render(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (ColumnType::Serial, Dialect::MySql) => "INT PRIMARY KEY AUTO_INCREMENT".to_string(),
            (ColumnType::Serial, Dialect::Sqlite) => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            (ColumnType::Int, _) => "INT".to_string(),
            (ColumnType::VarChar(len), _) => format!("VARCHAR({})", len),
            (ColumnType::Date, _) => "DATE".to_string(),
            (ColumnType::Time, _) => "TIME".to_string(),
            (ColumnType::Decimal { precision, scale }, _) => {
                format!("DECIMAL({},{})", precision, scale)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
    pub allowed_values: &'static [&'static str],
}

impl ColumnDefinition {
    pub fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            not_null: false,
            unique: false,
            default: None,
            allowed_values: &[],
        }
    }

    pub fn serial(name: &'static str) -> Self {
        Self::new(name, ColumnType::Serial)
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_text(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = values;
        self
    }

    pub fn render(&self, dialect: Dialect) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.render(dialect));

        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = self.default {
            sql.push_str(&format!(" DEFAULT '{}'", default));
        }
        if !self.allowed_values.is_empty() {
            let values: Vec<String> = self
                .allowed_values
                .iter()
                .map(|value| format!("'{}'", value))
                .collect();
            sql.push_str(&format!(" CHECK ({} IN ({}))", self.name, values.join(",")));
        }

        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub column: &'static str,
    pub parent_table: &'static str,
    pub parent_column: &'static str,
}

impl ForeignKey {
    pub fn render(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.column, self.parent_table, self.parent_column
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn references(
        mut self,
        column: &'static str,
        parent_table: &'static str,
        parent_column: &'static str,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column,
            parent_table,
            parent_column,
        });
        self
    }

    pub fn primary_key(&self) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|column| column.column_type == ColumnType::Serial)
            .map(|column| column.name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }

    /// Parent tables this declaration depends on, excluding self references.
    pub fn parents(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.foreign_keys
            .iter()
            .map(|fk| fk.parent_table)
            .filter(move |parent| *parent != self.name)
    }

    pub fn create_statement(&self, dialect: Dialect) -> String {
        let body: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.render(dialect))
            .chain(self.foreign_keys.iter().map(ForeignKey::render))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            body.join(",\n    ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDefinition {
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

impl IndexDefinition {
    pub fn new(name: &'static str, table: &'static str, column: &'static str) -> Self {
        Self { name, table, column }
    }

    /// MySQL has no `IF NOT EXISTS` for indexes, so the catalog check in front of this
    /// statement is the only guard there.
    pub fn create_statement(&self, dialect: Dialect) -> String {
        let guard = match dialect {
            Dialect::MySql => "",
            Dialect::Sqlite => "IF NOT EXISTS ",
        };
        format!("CREATE INDEX {}{} ON {}({})", guard, self.name, self.table, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDefinition {
    pub name: &'static str,
    pub select: &'static str,
}

impl ViewDefinition {
    pub fn new(name: &'static str, select: &'static str) -> Self {
        Self { name, select }
    }

    pub fn replace_statements(&self, dialect: Dialect) -> Vec<String> {
        match dialect {
            Dialect::MySql => vec![format!(
                "CREATE OR REPLACE VIEW {} AS\n{}",
                self.name,
                self.select.trim()
            )],
            Dialect::Sqlite => vec![
                format!("DROP VIEW IF EXISTS {}", self.name),
                format!("CREATE VIEW {} AS\n{}", self.name, self.select.trim()),
            ],
        }
    }
}
