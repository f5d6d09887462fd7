use crate::error::VerifyError;
use crate::product::{NewProduct, ProductId, ProductRow};
use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Read and delete access to the `Products` table.
///
/// Calls block on database I/O; the verifier runs them on tokio's blocking pool.
pub trait ProductStore: Send + Sync {
    fn find_product(&self, id: &ProductId) -> Result<Option<ProductRow>, VerifyError>;

    /// Delete the product and return the number of removed rows.
    fn delete_product(&self, id: &ProductId) -> Result<usize, VerifyError>;
}

impl ToSql for ProductId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            ProductId::Int(id) => id.to_sql(),
            ProductId::Text(id) => id.to_sql(),
        }
    }
}

pub struct SqliteProductStore {
    conn: Mutex<Connection>,
}

impl SqliteProductStore {
    /// Open an existing database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened database at {:?}", path.as_ref());
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create the `Products` table when it does not exist yet.
    pub fn ensure_schema(&self) -> Result<(), VerifyError> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Products (
                Id INTEGER PRIMARY KEY AUTOINCREMENT,
                Name TEXT NOT NULL,
                Price REAL NOT NULL,
                Quantity INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert a product directly (local setups and fakes of the API).
    pub fn insert_product(&self, product: &NewProduct) -> Result<i64, VerifyError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO Products (Name, Price, Quantity) VALUES (?1, ?2, ?3)",
            params![product.name, product.price, product.quantity],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, VerifyError> {
        self.conn.lock().map_err(|_| VerifyError::LockPoisoned)
    }
}

impl ProductStore for SqliteProductStore {
    fn find_product(&self, id: &ProductId) -> Result<Option<ProductRow>, VerifyError> {
        let row = self
            .conn()?
            .query_row(
                "SELECT Name, Price, Quantity FROM Products WHERE Id = ?1",
                params![id],
                |row| {
                    Ok(ProductRow {
                        name: row.get(0)?,
                        price: row.get(1)?,
                        quantity: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn delete_product(&self, id: &ProductId) -> Result<usize, VerifyError> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM Products WHERE Id = ?1", params![id])?;
        Ok(deleted)
    }
}
