//! `RowStore` over a SQLite connection
//!
//! Filters render to a parameterised `WHERE` clause. Id lists bind as a
//! single JSON array expanded with `json_each`, so a large subtree never
//! runs into the host parameter limit. Transactions are savepoints, which
//! nest when an engine operation runs inside a caller's transaction.

use arbor_core::model::ClosureEdge;
use arbor_core::rows::{
    AncestorFilter, DescendantFilter, EdgeFilter, OrderBy, OrderUpdate, RowStore,
};
use arbor_core::{ArborConfig, ArborError};
use arbor_core_types::NodeId;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::errors::{corrupt_value, persistence, Result};

const COLUMNS: &str = "parent_id, child_id, depth, node_order";

/// Must match `arbor_core::rows::sort_edges`
const TIEBREAK: &str = "child_id ASC, parent_id ASC, depth ASC";

pub struct SqliteRowStore {
    conn: Connection,
    table: String,
    chunk_size: usize,
    savepoints: usize,
}

impl SqliteRowStore {
    /// Wrap `conn`, reading rows from `config.closure_table`
    ///
    /// The table must already exist; see
    /// [`create_closure_table`](crate::schema::create_closure_table).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(conn: Connection, config: &ArborConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            conn,
            table: config.closure_table.clone(),
            chunk_size: config.insert_chunk_size,
            savepoints: 0,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Conjunction of SQL predicates with their bound values, in order
#[derive(Debug, Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, clause: &str, param: Option<Value>) {
        self.clauses.push(clause.to_string());
        self.params.extend(param);
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn render_filter(filter: &EdgeFilter) -> Result<Conditions> {
    let mut cond = Conditions::default();

    match &filter.ancestor {
        AncestorFilter::Any => {}
        AncestorFilter::Null => cond.push("parent_id IS NULL", None),
        AncestorFilter::NotNull => cond.push("parent_id IS NOT NULL", None),
        AncestorFilter::Is(id) => cond.push("parent_id = ?", Some(Value::Integer(id.get()))),
        AncestorFilter::In(ids) => cond.push(
            "parent_id IN (SELECT value FROM json_each(?))",
            Some(id_list(ids)?),
        ),
        AncestorFilter::OutsideOf(ids) => cond.push(
            "(parent_id IS NULL OR parent_id NOT IN (SELECT value FROM json_each(?)))",
            Some(id_list(ids)?),
        ),
    }

    match &filter.descendant {
        DescendantFilter::Any => {}
        DescendantFilter::Is(id) => cond.push("child_id = ?", Some(Value::Integer(id.get()))),
        DescendantFilter::In(ids) => cond.push(
            "child_id IN (SELECT value FROM json_each(?))",
            Some(id_list(ids)?),
        ),
    }

    if let Some(id) = filter.exclude_descendant {
        cond.push("child_id <> ?", Some(Value::Integer(id.get())));
    }
    if let Some(depth) = filter.depth {
        cond.push("depth = ?", Some(Value::Integer(depth.into())));
    }
    if let Some(depth) = filter.min_depth {
        cond.push("depth >= ?", Some(Value::Integer(depth.into())));
    }
    // comparisons with NULL are never true, so unranked rows drop out
    if let Some(from) = filter.order_from {
        cond.push("node_order >= ?", Some(Value::Integer(from.into())));
    }
    if let Some(to) = filter.order_to {
        cond.push("node_order <= ?", Some(Value::Integer(to.into())));
    }

    Ok(cond)
}

fn id_list(ids: &[NodeId]) -> Result<Value> {
    Ok(Value::Text(serde_json::to_string(ids)?))
}

fn order_sql(order_by: &[OrderBy]) -> String {
    let mut keys: Vec<&str> = order_by
        .iter()
        .map(|key| match key {
            OrderBy::DepthAsc => "depth ASC",
            OrderBy::DepthDesc => "depth DESC",
            OrderBy::OrderAsc => "node_order ASC",
            OrderBy::OrderDesc => "node_order DESC",
        })
        .collect();
    keys.push(TIEBREAK);
    format!(" ORDER BY {}", keys.join(", "))
}

fn edge_values(edge: &ClosureEdge) -> [Value; 4] {
    [
        edge.ancestor.map_or(Value::Null, |id| Value::Integer(id.get())),
        Value::Integer(edge.descendant.get()),
        Value::Integer(edge.depth.into()),
        edge.order.map_or(Value::Null, |order| Value::Integer(order.into())),
    ]
}

type RawRow = (Option<i64>, i64, i64, Option<i64>);

fn edge_from_columns((parent, child, depth, order): RawRow) -> Result<ClosureEdge> {
    Ok(ClosureEdge {
        ancestor: parent.map(NodeId::new),
        descendant: NodeId::new(child),
        depth: u32::try_from(depth).map_err(|_| corrupt_value("depth", depth))?,
        order: order
            .map(|o| u32::try_from(o).map_err(|_| corrupt_value("node_order", o)))
            .transpose()?,
    })
}

impl RowStore for SqliteRowStore {
    fn select_rows(
        &self,
        filter: &EdgeFilter,
        order_by: &[OrderBy],
        limit: Option<usize>,
    ) -> Result<Vec<ClosureEdge>> {
        let mut cond = render_filter(filter)?;
        let mut sql = format!(
            "SELECT {} FROM \"{}\"{}{}",
            COLUMNS,
            self.table,
            cond.where_sql(),
            order_sql(order_by)
        );
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            cond.params
                .push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| persistence("select_rows", e))?;
        let raw = stmt
            .query_map(params_from_iter(cond.params.iter()), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .map_err(|e| persistence("select_rows", e))?
            .collect::<std::result::Result<Vec<RawRow>, _>>()
            .map_err(|e| persistence("select_rows", e))?;

        raw.into_iter().map(edge_from_columns).collect()
    }

    fn bulk_insert(&mut self, rows: &[ClosureEdge]) -> Result<()> {
        let mut chunks = 0usize;
        for chunk in rows.chunks(self.chunk_size) {
            let placeholders = vec!["(?, ?, ?, ?)"; chunk.len()].join(", ");
            let sql = format!(
                "INSERT INTO \"{}\" ({}) VALUES {}",
                self.table, COLUMNS, placeholders
            );
            let params: Vec<Value> = chunk.iter().flat_map(edge_values).collect();
            self.conn
                .execute(&sql, params_from_iter(params.iter()))
                .map_err(|e| persistence("bulk_insert", e))?;
            chunks += 1;
        }
        tracing::debug!(row_count = rows.len(), chunks, "inserted closure rows");
        Ok(())
    }

    fn bulk_update(&mut self, filter: &EdgeFilter, update: OrderUpdate) -> Result<usize> {
        let cond = render_filter(filter)?;

        let (set_sql, value) = match update {
            OrderUpdate::Set(rank) => ("node_order = ?", Value::Integer(rank.into())),
            OrderUpdate::Shift(delta) => {
                let mut guard = Conditions {
                    clauses: cond.clauses.clone(),
                    params: cond.params.clone(),
                };
                guard.push("node_order + ? < 1", Some(Value::Integer(delta)));
                let sql = format!(
                    "SELECT child_id, node_order FROM \"{}\"{} LIMIT 1",
                    self.table,
                    guard.where_sql()
                );
                let mut stmt = self
                    .conn
                    .prepare(&sql)
                    .map_err(|e| persistence("bulk_update", e))?;
                let mut rows = stmt
                    .query(params_from_iter(guard.params.iter()))
                    .map_err(|e| persistence("bulk_update", e))?;
                if let Some(row) = rows.next().map_err(|e| persistence("bulk_update", e))? {
                    let child: i64 = row.get(0).map_err(|e| persistence("bulk_update", e))?;
                    let order: i64 = row.get(1).map_err(|e| persistence("bulk_update", e))?;
                    return Err(ArborError::CorruptClosure {
                        reason: format!("rank of node {} would become {}", child, order + delta),
                    });
                }
                ("node_order = node_order + ?", Value::Integer(delta))
            }
        };

        let sql = format!(
            "UPDATE \"{}\" SET {}{}",
            self.table,
            set_sql,
            cond.where_sql()
        );
        let params = std::iter::once(value).chain(cond.params);
        self.conn
            .execute(&sql, params_from_iter(params))
            .map_err(|e| persistence("bulk_update", e))
    }

    fn delete_rows(&mut self, filter: &EdgeFilter) -> Result<usize> {
        let cond = render_filter(filter)?;
        let sql = format!("DELETE FROM \"{}\"{}", self.table, cond.where_sql());
        self.conn
            .execute(&sql, params_from_iter(cond.params.iter()))
            .map_err(|e| persistence("delete_rows", e))
    }

    fn transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let name = format!("arbor_sp_{}", self.savepoints);
        self.conn
            .execute_batch(&format!("SAVEPOINT {}", name))
            .map_err(|e| persistence("transaction", e))?;

        self.savepoints += 1;
        let outcome = work(self);
        self.savepoints -= 1;

        match outcome {
            Ok(value) => {
                self.conn
                    .execute_batch(&format!("RELEASE {}", name))
                    .map_err(|e| persistence("transaction", e))?;
                Ok(value)
            }
            Err(err) => {
                let undo = format!("ROLLBACK TO {name}; RELEASE {name}");
                if let Err(rollback) = self.conn.execute_batch(&undo) {
                    tracing::warn!(savepoint = %name, error = %rollback, "savepoint rollback failed");
                }
                Err(err)
            }
        }
    }
}
