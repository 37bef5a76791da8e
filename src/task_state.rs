//! Task state schema
//!
//! A task state is a resource-usage sample of one task over a measurement
//! interval. Metrics that were not observed are `-1`. Columns are always
//! listed sorted by name, which is the order the columnar layout stores them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Physical type of a task state column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    Float64,
    String,
}

/// A named, typed column of the task state schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

/// A value coerced to its column type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int64(i64),
    Float64(f64),
    String(String),
}

/// Resource usage of a task over `[ts_start, ts_end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    /// Start of the measurement period
    pub ts_start: i64,
    /// End of the measurement period
    pub ts_end: i64,
    pub workflow_id: i64,
    pub task_id: i64,
    /// Resource the state was sampled on
    pub resource_id: i64,
    /// Mean CPU usage rate
    pub cpu_rate: f64,
    /// User-accessible pages, including page cache
    pub canonical_memory_usage: f64,
    pub assigned_memory: f64,
    pub minimum_memory_usage: f64,
    pub maximum_memory_usage: f64,
    /// Total time spent on disk IO in milliseconds
    pub disk_io_time: i64,
    pub maximum_disk_bandwidth: f64,
    /// Local disk space used, either a fraction or MB
    pub local_disk_space_usage: f64,
    pub maximum_cpu_rate: f64,
    /// Longest stretch of consecutive disk IO
    pub maximum_disk_io_time: i64,
    /// Samples taken per second
    pub sample_rate: f64,
    /// Expected over observed samples
    pub sample_portion: f64,
    pub sampled_cpu_usage: f64,
    /// Total time spent on network IO in milliseconds
    pub network_io_time: f64,
    pub maximum_network_bandwidth: f64,
    /// Bytes in
    pub network_in: i64,
    /// Bytes out
    pub network_out: i64,
}

/// Column list in declaration order; sorted on access
const COLUMNS: [(&str, ColumnType); 23] = [
    ("ts_start", ColumnType::Int64),
    ("ts_end", ColumnType::Int64),
    ("workflow_id", ColumnType::Int64),
    ("task_id", ColumnType::Int64),
    ("resource_id", ColumnType::Int64),
    ("cpu_rate", ColumnType::Float64),
    ("canonical_memory_usage", ColumnType::Float64),
    ("assigned_memory", ColumnType::Float64),
    ("minimum_memory_usage", ColumnType::Float64),
    ("maximum_memory_usage", ColumnType::Float64),
    ("disk_io_time", ColumnType::Int64),
    ("maximum_disk_bandwidth", ColumnType::Float64),
    ("local_disk_space_usage", ColumnType::Float64),
    ("maximum_cpu_rate", ColumnType::Float64),
    ("maximum_disk_io_time", ColumnType::Int64),
    ("sample_rate", ColumnType::Float64),
    ("sample_portion", ColumnType::Float64),
    ("sampled_cpu_usage", ColumnType::Float64),
    ("network_io_time", ColumnType::Float64),
    ("maximum_network_bandwidth", ColumnType::Float64),
    ("network_in", ColumnType::Int64),
    ("network_out", ColumnType::Int64),
    ("version", ColumnType::String),
];

impl TaskState {
    /// Schema version stamped on every row
    pub const VERSION: &'static str = "1.0";

    /// Create a task state with every metric unknown (`-1`)
    pub fn new(ts_start: i64, ts_end: i64, workflow_id: i64, task_id: i64, resource_id: i64) -> Self {
        Self {
            ts_start,
            ts_end,
            workflow_id,
            task_id,
            resource_id,
            cpu_rate: -1.0,
            canonical_memory_usage: -1.0,
            assigned_memory: -1.0,
            minimum_memory_usage: -1.0,
            maximum_memory_usage: -1.0,
            disk_io_time: -1,
            maximum_disk_bandwidth: -1.0,
            local_disk_space_usage: -1.0,
            maximum_cpu_rate: -1.0,
            maximum_disk_io_time: -1,
            sample_rate: -1.0,
            sample_portion: -1.0,
            sampled_cpu_usage: -1.0,
            network_io_time: -1.0,
            maximum_network_bandwidth: -1.0,
            network_in: -1,
            network_out: -1,
        }
    }

    /// All columns, sorted by name
    pub fn schema() -> Vec<SchemaField> {
        let mut fields: Vec<SchemaField> = COLUMNS
            .iter()
            .map(|&(name, column_type)| SchemaField {
                name,
                column_type,
                nullable: false,
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(b.name));
        fields
    }

    /// Directory holding rows of this schema version, e.g. `schema-1.0`
    pub fn versioned_dir_name() -> String {
        format!("schema-{}", Self::VERSION)
    }

    /// Relative output location, e.g. `task-states/schema-1.0`
    pub fn output_path() -> PathBuf {
        PathBuf::from("task-states").join(Self::versioned_dir_name())
    }

    /// JSON object with every field plus `version`
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "version".to_string(),
                serde_json::Value::String(Self::VERSION.to_string()),
            );
        }
        Ok(value)
    }

    /// Row values in schema (name-sorted) order
    pub fn parquet_row(&self) -> Vec<(&'static str, ColumnValue)> {
        Self::schema()
            .into_iter()
            .filter_map(|field| self.column(field.name).map(|value| (field.name, value)))
            .collect()
    }

    /// Value of the named column, or None for a name outside the schema
    pub fn column(&self, name: &str) -> Option<ColumnValue> {
        use ColumnValue::{Float64, Int64};
        let value = match name {
            "ts_start" => Int64(self.ts_start),
            "ts_end" => Int64(self.ts_end),
            "workflow_id" => Int64(self.workflow_id),
            "task_id" => Int64(self.task_id),
            "resource_id" => Int64(self.resource_id),
            "cpu_rate" => Float64(self.cpu_rate),
            "canonical_memory_usage" => Float64(self.canonical_memory_usage),
            "assigned_memory" => Float64(self.assigned_memory),
            "minimum_memory_usage" => Float64(self.minimum_memory_usage),
            "maximum_memory_usage" => Float64(self.maximum_memory_usage),
            "disk_io_time" => Int64(self.disk_io_time),
            "maximum_disk_bandwidth" => Float64(self.maximum_disk_bandwidth),
            "local_disk_space_usage" => Float64(self.local_disk_space_usage),
            "maximum_cpu_rate" => Float64(self.maximum_cpu_rate),
            "maximum_disk_io_time" => Int64(self.maximum_disk_io_time),
            "sample_rate" => Float64(self.sample_rate),
            "sample_portion" => Float64(self.sample_portion),
            "sampled_cpu_usage" => Float64(self.sampled_cpu_usage),
            "network_io_time" => Float64(self.network_io_time),
            "maximum_network_bandwidth" => Float64(self.maximum_network_bandwidth),
            "network_in" => Int64(self.network_in),
            "network_out" => Int64(self.network_out),
            "version" => ColumnValue::String(Self::VERSION.to_string()),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_unknown() {
        let state = TaskState::new(0, 10, 1, 2, 3);
        assert_eq!(state.ts_end, 10);
        assert_eq!(state.cpu_rate, -1.0);
        assert_eq!(state.network_out, -1);
        assert_eq!(state.disk_io_time, -1);
    }

    #[test]
    fn test_schema_sorted_and_complete() {
        let schema = TaskState::schema();
        assert_eq!(schema.len(), 23);

        let names: Vec<&str> = schema.iter().map(|f| f.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.first(), Some(&"assigned_memory"));
        assert_eq!(names.last(), Some(&"workflow_id"));
        assert!(schema.iter().all(|f| !f.nullable));
    }

    #[test]
    fn test_schema_column_types() {
        let schema = TaskState::schema();
        let type_of = |name: &str| {
            schema
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.column_type)
        };
        assert_eq!(type_of("network_io_time"), Some(ColumnType::Float64));
        assert_eq!(type_of("maximum_disk_io_time"), Some(ColumnType::Int64));
        assert_eq!(type_of("version"), Some(ColumnType::String));
    }

    #[test]
    fn test_versioned_paths() {
        assert_eq!(TaskState::versioned_dir_name(), "schema-1.0");
        assert_eq!(
            TaskState::output_path(),
            PathBuf::from("task-states").join("schema-1.0")
        );
    }

    #[test]
    fn test_json_value_has_version() {
        let mut state = TaskState::new(5, 6, 7, 8, 9);
        state.cpu_rate = 0.75;
        let json = state.to_json_value().unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["cpu_rate"], 0.75);
        assert_eq!(json["task_id"], 8);
        assert_eq!(json.as_object().map(|o| o.len()), Some(23));
    }

    #[test]
    fn test_column_lookup() {
        let state = TaskState::new(1, 2, 3, 4, 5);
        assert_eq!(state.column("task_id"), Some(ColumnValue::Int64(4)));
        assert_eq!(
            state.column("version"),
            Some(ColumnValue::String("1.0".to_string()))
        );
        assert_eq!(state.column("cpu"), None);
        assert_eq!(state.column(""), None);
    }

    #[test]
    fn test_every_schema_column_has_a_value() {
        let state = TaskState::new(1, 2, 3, 4, 5);
        for field in TaskState::schema() {
            assert!(state.column(field.name).is_some(), "no value for {}", field.name);
        }
    }

    #[test]
    fn test_parquet_row_matches_schema_order() {
        let mut state = TaskState::new(1, 2, 3, 4, 5);
        state.network_in = 4096;
        let row = state.parquet_row();
        let schema = TaskState::schema();

        assert_eq!(row.len(), schema.len());
        for ((name, value), field) in row.iter().zip(schema.iter()) {
            assert_eq!(*name, field.name);
            let matches = matches!(
                (value, field.column_type),
                (ColumnValue::Int64(_), ColumnType::Int64)
                    | (ColumnValue::Float64(_), ColumnType::Float64)
                    | (ColumnValue::String(_), ColumnType::String)
            );
            assert!(matches, "column {} has wrong value type", name);
        }
        assert!(row.contains(&("network_in", ColumnValue::Int64(4096))));
        assert!(row.contains(&("version", ColumnValue::String("1.0".to_string()))));
    }
}
