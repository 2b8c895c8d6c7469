use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::store::{Task, TaskStore};

/// Field separator inside a record line. The parser anchors on this
/// quote-comma-quote boundary, which is why commas inside field values are
/// safe while double quotes are not representable at all.
const SEPARATOR: &str = "\",\"";

/// Render the store as the line-oriented quoted-field format, one record
/// per line: `"title","description","due_date","0|1"`.
pub fn serialize(store: &TaskStore) -> String {
    let mut out = String::new();
    for task in store.iter() {
        out.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",\"{}\"\n",
            task.title,
            task.description,
            task.due_date,
            if task.completed { '1' } else { '0' },
        ));
    }
    out
}

/// Tokenize one record line. A line must start and end with a double quote
/// and split on `","` into exactly four fields, none of which may contain
/// a double quote. `completed` is true iff the fourth field is exactly `1`.
fn parse_line(line: &str) -> Option<Task> {
    let inner = line.strip_prefix('"')?.strip_suffix('"')?;
    let fields: Vec<&str> = inner.split(SEPARATOR).collect();
    if fields.len() != 4 || fields.iter().any(|field| field.contains('"')) {
        return None;
    }

    let mut task = Task::new(
        fields[0].to_string(),
        fields[1].to_string(),
        fields[2].to_string(),
    );
    task.completed = fields[3] == "1";
    Some(task)
}

/// Parse the whole backing-file content. A line that does not tokenize
/// aborts loading with `Error::MalformedLine` naming the 1-based line
/// number, rather than fabricating an empty record.
pub fn parse(content: &str) -> Result<TaskStore> {
    let mut store = TaskStore::new();
    for (number, line) in content.lines().enumerate() {
        let task = parse_line(line).ok_or_else(|| Error::MalformedLine {
            line: number + 1,
            text: line.to_string(),
        })?;
        store.append(task);
    }
    Ok(store)
}

/// Read and parse the backing file. A missing file yields an empty store;
/// any other I/O failure propagates.
pub fn load(path: &Path) -> Result<TaskStore> {
    match fs::read_to_string(path) {
        Ok(content) => parse(&content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(TaskStore::new()),
        Err(err) => Err(err.into()),
    }
}

/// Write the store to the backing file, replacing any previous content.
pub fn save(path: &Path, store: &TaskStore) -> Result<()> {
    fs::write(path, serialize(store))?;
    Ok(())
}
