//! Arena over the flat `data` array of a node-graph payload.
//!
//! Every field of a record is either a literal or an integer index into
//! `data`. Indices are kept as positions; nothing is rebuilt into a pointer
//! graph.

use hugchat_types::DecodeError;
use serde_json::{Map, Value};

/// Largest float that still represents every integer below it exactly.
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

static NULL: Value = Value::Null;

/// A decoded `data` array plus path-aware dereferencing.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    data: Vec<Value>,
}

impl NodeGraph {
    pub fn new(data: Vec<Value>) -> Self {
        Self { data }
    }

    /// Build from the `data` member of a node object.
    pub fn from_node(mut node: Value, path: &str) -> Result<Self, DecodeError> {
        match node.get_mut("data").map(Value::take) {
            Some(Value::Array(data)) => Ok(Self::new(data)),
            _ => Err(DecodeError::shape(format!("{path}.data"), "array")),
        }
    }

    /// The index map at `data[0]` naming the top-level fields.
    pub fn index_map(&self) -> Result<&Map<String, Value>, DecodeError> {
        self.data
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| DecodeError::shape("data[0]", "object"))
    }

    /// Follow one index. Negative indices are the encoder's null sentinels.
    pub fn deref(&self, index: &Value, path: &str) -> Result<&Value, DecodeError> {
        let Some(position) = to_index(index, path)? else {
            return Ok(&NULL);
        };
        self.data.get(position).ok_or_else(|| DecodeError::IndexOutOfRange {
            path: path.to_string(),
            index: position,
            len: self.data.len(),
        })
    }

    /// Dereference `record[key]`.
    pub fn field<'a>(
        &'a self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<&'a Value, DecodeError> {
        let field_path = format!("{path}.{key}");
        let index = record.get(key).ok_or_else(|| DecodeError::shape(&field_path, "index"))?;
        self.deref(index, &field_path)
    }

    /// Dereference `record[key]` when the key may be absent.
    pub fn optional_field<'a>(
        &'a self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<Option<&'a Value>, DecodeError> {
        match record.get(key) {
            None => Ok(None),
            Some(index) => self.deref(index, &format!("{path}.{key}")).map(Some),
        }
    }

    pub fn string(
        &self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<String, DecodeError> {
        self.field(record, key, path)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecodeError::shape(format!("{path}.{key}"), "string"))
    }

    /// String field whose value may be a null sentinel.
    pub fn nullable_string(
        &self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<Option<String>, DecodeError> {
        match self.field(record, key, path)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(DecodeError::shape(format!("{path}.{key}"), "string")),
        }
    }

    pub fn boolean(
        &self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<bool, DecodeError> {
        self.field(record, key, path)?
            .as_bool()
            .ok_or_else(|| DecodeError::shape(format!("{path}.{key}"), "bool"))
    }

    /// An array of indices, each resolved to the record object it points at.
    /// Yields `(path, record)` pairs.
    pub fn records<'a>(
        &'a self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<Vec<(String, &'a Map<String, Value>)>, DecodeError> {
        let list_path = format!("{path}.{key}");
        let list = self
            .field(record, key, path)?
            .as_array()
            .ok_or_else(|| DecodeError::shape(&list_path, "array"))?;

        list.iter()
            .enumerate()
            .map(|(i, index)| {
                let item_path = format!("{list_path}[{i}]");
                let item = self
                    .deref(index, &item_path)?
                    .as_object()
                    .ok_or_else(|| DecodeError::shape(&item_path, "object"))?;
                Ok((item_path, item))
            })
            .collect()
    }

    /// An array of indices, each resolved to a string.
    pub fn string_list(
        &self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<Vec<String>, DecodeError> {
        let list_path = format!("{path}.{key}");
        let list = match self.field(record, key, path)? {
            Value::Null => return Ok(Vec::new()),
            Value::Array(list) => list,
            _ => return Err(DecodeError::shape(&list_path, "array")),
        };

        list.iter()
            .enumerate()
            .map(|(i, index)| {
                let item_path = format!("{list_path}[{i}]");
                self.deref(index, &item_path)?
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DecodeError::shape(item_path, "string"))
            })
            .collect()
    }

    /// A date stored as `["Date", "<rfc3339>"]`. Unparseable text yields `None`.
    pub fn date(
        &self,
        record: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Result<Option<chrono::DateTime<chrono::Utc>>, DecodeError> {
        let date_path = format!("{path}.{key}");
        let text = match self.field(record, key, path)? {
            Value::Null => return Ok(None),
            Value::Array(pair) => pair
                .get(1)
                .and_then(Value::as_str)
                .ok_or_else(|| DecodeError::shape(format!("{date_path}[1]"), "string"))?,
            _ => return Err(DecodeError::shape(&date_path, "array")),
        };

        Ok(chrono::DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|d| d.with_timezone(&chrono::Utc)))
    }

    /// An unsigned number behind an index; a null sentinel yields `None`.
    pub fn number(&self, index: &Value, path: &str) -> Result<Option<u64>, DecodeError> {
        match self.deref(index, path)? {
            Value::Null => Ok(None),
            value => to_index(value, path)?
                .map(|n| Some(n as u64))
                .ok_or_else(|| DecodeError::shape(path, "unsigned number")),
        }
    }
}

/// Convert a JSON number to an array position.
///
/// Returns `Ok(None)` for negative values. Floats must be integral and below
/// 2^53.
pub(crate) fn to_index(value: &Value, path: &str) -> Result<Option<usize>, DecodeError> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).map(Some).map_err(|_| DecodeError::shape(path, "index"));
    }
    if let Some(n) = value.as_i64() {
        debug_assert!(n < 0);
        return Ok(None);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INDEX => {
            Ok(if f < 0.0 { None } else { Some(f as usize) })
        },
        _ => Err(DecodeError::shape(path, "index")),
    }
}
