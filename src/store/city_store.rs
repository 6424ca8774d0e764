use crate::error::{PipelineError, Result};
use crate::models::CityRecord;
use crate::store::schema;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, error};

/// One result row, columns in select order.
pub type QueryRow = Vec<Value>;

/// Single-table SQLite store holding [`CityRecord`] rows.
///
/// The connection is released when the store is dropped or closed.
pub struct CityStore {
    conn: Connection,
}

impl CityStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| PipelineError::Connection {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened city store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| PipelineError::Connection {
            path: ":memory:".into(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Create the table if it is missing. An existing table is left as is,
    /// even when its columns differ.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::CREATE_TABLE)?;
        Ok(())
    }

    /// Append every record in one transaction.
    ///
    /// Nothing is committed unless all rows are written; on error the
    /// transaction is dropped and rolled back.
    pub fn insert_many(&mut self, records: &[CityRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(schema::INSERT_ROW)?;
            for r in records {
                stmt.execute(params![
                    r.geoname_id,
                    r.name,
                    r.ascii_name,
                    r.alternate_names,
                    r.feature_class,
                    r.feature_code,
                    r.country_code,
                    r.country_name_en,
                    r.country_code_2,
                    r.admin1_code,
                    r.admin2_code,
                    r.admin3_code,
                    r.admin4_code,
                    r.population,
                    r.elevation,
                    r.digital_elevation_model,
                    r.timezone,
                    r.modification_date,
                    r.label_en,
                    r.coordinates,
                ])?;
            }
        }
        tx.commit()?;

        debug!("inserted {} rows into {}", records.len(), schema::TABLE);
        Ok(records.len())
    }

    /// Run a read-only statement and return every row.
    pub fn try_query(&self, sql: &str) -> Result<Vec<QueryRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(PipelineError::NotReadOnly(sql.trim().to_string()));
        }

        let width = stmt.column_count();
        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<QueryRow>>()
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Like [`CityStore::try_query`], but a failure is logged and comes back
    /// as an empty result, indistinguishable from a query with no rows.
    pub fn query(&self, sql: &str) -> Vec<QueryRow> {
        match self.try_query(sql) {
            Ok(rows) => rows,
            Err(e) => {
                error!(kind = e.kind(), "Error executing the query: {}", e);
                Vec::new()
            }
        }
    }

    pub fn all_records(&self) -> Result<Vec<CityRecord>> {
        let mut stmt = self.conn.prepare(schema::SELECT_ALL)?;
        let records = stmt
            .query_map([], city_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(schema::COUNT_ROWS, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| PipelineError::Store(e))
    }
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<CityRecord> {
    Ok(CityRecord {
        geoname_id: row.get(0)?,
        name: row.get(1)?,
        ascii_name: row.get(2)?,
        alternate_names: row.get(3)?,
        feature_class: row.get(4)?,
        feature_code: row.get(5)?,
        country_code: row.get(6)?,
        country_name_en: row.get(7)?,
        country_code_2: row.get(8)?,
        admin1_code: row.get(9)?,
        admin2_code: row.get(10)?,
        admin3_code: row.get(11)?,
        admin4_code: row.get(12)?,
        population: row.get(13)?,
        elevation: row.get(14)?,
        digital_elevation_model: row.get(15)?,
        timezone: row.get(16)?,
        modification_date: row.get(17)?,
        label_en: row.get(18)?,
        coordinates: row.get(19)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::city::fixtures::city;
    use tempfile::TempDir;

    fn store_with_schema() -> CityStore {
        let store = CityStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_ensure_schema_is_idempotent() -> Result<()> {
        let store = store_with_schema();
        store.ensure_schema()?;

        let tables = store.try_query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'city_data'",
        )?;
        assert_eq!(tables.len(), 1);
        Ok(())
    }

    #[test]
    fn test_existing_table_is_not_altered() -> Result<()> {
        let store = CityStore::open_in_memory()?;
        store
            .conn
            .execute_batch("CREATE TABLE city_data (geoname_id INTEGER)")?;
        store.ensure_schema()?;

        let columns = store.try_query("SELECT name FROM pragma_table_info('city_data')")?;
        assert_eq!(columns.len(), 1);
        Ok(())
    }

    #[test]
    fn test_insert_and_read_back() -> Result<()> {
        let mut store = store_with_schema();
        let records = vec![
            city(1, "FR", "France", 500),
            city(2, "FR", "France", 2_000_000),
            city(3, "MC", "Monaco", 100),
        ];

        assert_eq!(store.insert_many(&records)?, 3);

        let mut stored = store.all_records()?;
        stored.sort_by_key(|r| r.geoname_id);
        assert_eq!(stored, records);
        assert_eq!(store.query(schema::SELECT_ALL).len(), 3);
        Ok(())
    }

    #[test]
    fn test_duplicate_rows_are_kept() -> Result<()> {
        let mut store = store_with_schema();
        let records = vec![city(7, "MC", "Monaco", 100)];

        store.insert_many(&records)?;
        store.insert_many(&records)?;

        assert_eq!(store.row_count()?, 2);
        Ok(())
    }

    #[test]
    fn test_insert_without_table_commits_nothing() {
        let mut store = CityStore::open_in_memory().unwrap();
        let err = store
            .insert_many(&[city(1, "FR", "France", 1)])
            .unwrap_err();
        assert_eq!(err.kind(), "StoreError");
    }

    #[test]
    fn test_query_failure_yields_empty_rows() {
        let store = store_with_schema();
        assert!(store.query("SELECT missing_column FROM city_data").is_empty());
        assert!(store.try_query("SELECT missing_column FROM city_data").is_err());
    }

    #[test]
    fn test_write_statements_are_rejected() {
        let mut store = store_with_schema();
        store.insert_many(&[city(1, "FR", "France", 1)]).unwrap();

        let err = store.try_query("DELETE FROM city_data").unwrap_err();
        assert!(matches!(err, PipelineError::NotReadOnly(_)));
        assert_eq!(store.row_count().unwrap(), 1);
    }

    #[test]
    fn test_rows_persist_across_connections() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cities.db");

        let mut store = CityStore::open(&path)?;
        store.ensure_schema()?;
        store.insert_many(&[city(1, "MC", "Monaco", 100)])?;
        store.close()?;

        let reopened = CityStore::open(&path)?;
        reopened.ensure_schema()?;
        assert_eq!(reopened.row_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_open_in_missing_directory_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("dir.db");

        let err = CityStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), "ConnectionError");
    }
}
