//! TOML manifest loading and dispatch onto job builders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value as TomlValue};

use crate::domain::{AppError, BlockResult, Builder, FieldKind, JobDescriptor, Value};

const NAME_KEY: &str = "name";
const INDEX_KEY: &str = "index";

/// A parsed manifest: an optional output directory plus job tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub prefix: Option<PathBuf>,
    pub jobs: Vec<JobEntry>,
}

/// One `[[job]]` table with its `name` split off.
#[derive(Debug, Clone, PartialEq)]
pub struct JobEntry {
    pub name: String,
    pub fields: Table,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    prefix: Option<PathBuf>,
    #[serde(default)]
    job: Vec<Table>,
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, AppError> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content)
}

pub fn parse_manifest(content: &str) -> Result<Manifest, AppError> {
    let raw: RawManifest = toml::from_str(content)?;
    if raw.job.is_empty() {
        return Err(AppError::manifest("no [[job]] tables declared"));
    }

    let jobs = raw
        .job
        .into_iter()
        .enumerate()
        .map(|(i, mut fields)| match fields.remove(NAME_KEY) {
            Some(TomlValue::String(name)) => Ok(JobEntry { name, fields }),
            Some(other) => Err(AppError::manifest(format!(
                "job #{} has a non-string name: {}",
                i + 1,
                other
            ))),
            None => Err(AppError::manifest(format!("job #{} is missing a name", i + 1))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Manifest { prefix: raw.prefix, jobs })
}

/// Declare the job and apply every manifest field through the builder.
pub fn build_job(prefix: &Path, entry: &JobEntry) -> Result<JobDescriptor, AppError> {
    let mut job = JobDescriptor::new(prefix, &entry.name)?;
    job.configure(|b| configure(b, &entry.fields))?;
    Ok(job)
}

/// Dispatch each table entry to the builder according to the field's kind.
pub fn configure(builder: &mut Builder, table: &Table) -> BlockResult {
    for (name, value) in table {
        let (key, kind) = builder.construct().resolve(name)?;
        match (kind, value) {
            (
                FieldKind::NestedDocument(_) | FieldKind::BoolOrNestedDocument(_),
                TomlValue::Table(t),
            ) => {
                builder.block(key, |b| configure(b, t))?;
            }
            (FieldKind::ArrayOfNestedDocuments(_), TomlValue::Table(t)) => {
                indexed_entry(builder, key, t)?;
            }
            (FieldKind::ArrayOfNestedDocuments(_), TomlValue::Array(items))
                if !items.is_empty() && items.iter().all(TomlValue::is_table) =>
            {
                for item in items.iter().filter_map(TomlValue::as_table) {
                    indexed_entry(builder, key, item)?;
                }
            }
            (FieldKind::MapOfBoolOrNestedDocuments(_), TomlValue::Table(entries)) => {
                for (entry, setting) in entries {
                    match setting {
                        TomlValue::Boolean(enabled) => {
                            builder.keyed_value(key, entry, *enabled)?;
                        }
                        TomlValue::Table(t) => {
                            builder.keyed_block(key, entry, |b| configure(b, t))?;
                        }
                        other => {
                            return Err(AppError::shape(
                                format!("{}.{}", key, entry),
                                "boolean or configuration table",
                                describe(other),
                            ));
                        }
                    }
                }
            }
            _ => {
                builder.set(key, convert(key, kind, value)?)?;
            }
        }
    }
    Ok(())
}

fn indexed_entry(builder: &mut Builder, key: &str, table: &Table) -> BlockResult {
    let index = match table.get(INDEX_KEY) {
        None => None,
        Some(TomlValue::Integer(i)) => Some(usize::try_from(*i).map_err(|_| {
            AppError::shape(format!("{}.{}", key, INDEX_KEY), "non-negative integer", i.to_string())
        })?),
        Some(other) => {
            return Err(AppError::shape(
                format!("{}.{}", key, INDEX_KEY),
                "non-negative integer",
                describe(other),
            ));
        }
    };
    let mut fields = table.clone();
    fields.remove(INDEX_KEY);
    builder.indexed_block(key, index, |b| configure(b, &fields))?;
    Ok(())
}

/// Convert a TOML value without coercion. Floats and datetimes have no
/// counterpart in any field kind.
fn convert(key: &str, kind: FieldKind, value: &TomlValue) -> Result<Value, AppError> {
    Ok(match value {
        TomlValue::String(s) => Value::String(s.clone()),
        TomlValue::Integer(i) => Value::Integer(*i),
        TomlValue::Boolean(b) => Value::Bool(*b),
        TomlValue::Array(items) => Value::Array(
            items.iter().map(|item| convert(key, kind, item)).collect::<Result<_, _>>()?,
        ),
        TomlValue::Table(t) => Value::Dict(
            t.iter()
                .map(|(k, v)| Ok((k.clone(), convert(key, kind, v)?)))
                .collect::<Result<_, AppError>>()?,
        ),
        TomlValue::Float(_) | TomlValue::Datetime(_) => {
            return Err(AppError::shape(key, kind, describe(value)));
        }
    })
}

fn describe(value: &TomlValue) -> String {
    format!("{} ({})", value, value.type_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDIS: &str = r#"
prefix = "/usr/local/Cellar/redis/2.0.1"

[[job]]
name = "io.redis.redis-server"
run_at_load = true
keep_alive = true
program_arguments = ["/usr/local/bin/redis-server", "/usr/local/etc/redis.conf"]
working_directory = "/usr/local/var"

[[job.start_calendar_interval]]
index = 2
minute = 0

[job.mach_services]
"com.example.port" = { reset_at_close = false, hide_until_check_in = true }
"com.example.other" = true

[job.soft_resource_limits]
number_of_files = 1024

[[job]]
name = "com.danga.memcached"
ProgramArguments = ["/usr/local/bin/memcached", "-l", "127.0.0.1"]
KeepAlive = { SuccessfulExit = false }
"#;

    #[test]
    fn parses_jobs_and_prefix() {
        let manifest = parse_manifest(REDIS).unwrap();
        assert_eq!(manifest.prefix, Some(PathBuf::from("/usr/local/Cellar/redis/2.0.1")));
        assert_eq!(manifest.jobs.len(), 2);
        assert_eq!(manifest.jobs[0].name, "io.redis.redis-server");
        assert!(!manifest.jobs[0].fields.contains_key("name"));
    }

    #[test]
    fn builds_nested_documents() {
        let manifest = parse_manifest(REDIS).unwrap();
        let prefix = manifest.prefix.clone().unwrap();
        let job = build_job(&prefix, &manifest.jobs[0]).unwrap();
        let doc = job.document();

        assert_eq!(doc.get("RunAtLoad"), Some(&Value::from(true)));
        assert_eq!(doc.get("KeepAlive"), Some(&Value::from(true)));
        assert_eq!(doc.get("WorkingDirectory"), Some(&Value::from("/usr/local/var")));

        let intervals = doc.get("StartCalendarInterval").and_then(Value::as_array).unwrap();
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0], Value::Absent);
        assert_eq!(intervals[2].as_dict().and_then(|d| d.get("Minute")), Some(&Value::from(0)));

        let services = doc.get("MachServices").and_then(Value::as_dict).unwrap();
        assert_eq!(services.get("com.example.other"), Some(&Value::from(true)));
        let port = services.get("com.example.port").and_then(Value::as_dict).unwrap();
        assert_eq!(port.get("ResetAtClose"), Some(&Value::from(false)));
        assert_eq!(port.get("HideUntilCheckIn"), Some(&Value::from(true)));

        let limits = doc.get("SoftResourceLimits").and_then(Value::as_dict).unwrap();
        assert_eq!(limits.get("NumberOfFiles"), Some(&Value::from(1024)));
    }

    #[test]
    fn canonical_keys_are_accepted() {
        let manifest = parse_manifest(REDIS).unwrap();
        let job = build_job(Path::new("/tmp"), &manifest.jobs[1]).unwrap();
        let keep_alive = job.document().get("KeepAlive").and_then(Value::as_dict).unwrap();
        assert_eq!(keep_alive.get("SuccessfulExit"), Some(&Value::from(false)));
    }

    #[test]
    fn appends_tables_without_index() {
        let manifest = parse_manifest(
            r#"
[[job]]
name = "svc"
program_arguments = ["/bin/svc"]

[[job.sockets]]
sock_service_name = "http"

[[job.sockets]]
sock_service_name = "https"
bonjour = ["https"]
"#,
        )
        .unwrap();
        let job = build_job(Path::new("/tmp"), &manifest.jobs[0]).unwrap();
        let sockets = job.document().get("Sockets").and_then(Value::as_array).unwrap();
        assert_eq!(sockets.len(), 2);
        assert_eq!(
            sockets[1].as_dict().and_then(|d| d.get("SockServiceName")),
            Some(&Value::from("https"))
        );
    }

    #[test]
    fn unknown_field_is_not_a_field() {
        let manifest =
            parse_manifest("[[job]]\nname = \"svc\"\nnot_a_real_field = 1\n").unwrap();
        let err = build_job(Path::new("/tmp"), &manifest.jobs[0]).unwrap_err();
        assert!(matches!(err, AppError::NotAField { .. }), "{err:?}");
    }

    #[test]
    fn floats_are_shape_errors() {
        let manifest = parse_manifest("[[job]]\nname = \"svc\"\nnice = 1.5\n").unwrap();
        let err = build_job(Path::new("/tmp"), &manifest.jobs[0]).unwrap_err();
        match err {
            AppError::Shape { field, .. } => assert_eq!(field, "Nice"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_a_shape_error() {
        let manifest = parse_manifest("[[job]]\nname = \"svc\"\nrun_at_load = \"yes\"\n").unwrap();
        let err = build_job(Path::new("/tmp"), &manifest.jobs[0]).unwrap_err();
        assert!(matches!(err, AppError::Shape { ref field, .. } if field == "RunAtLoad"));
    }

    #[test]
    fn huge_index_is_a_shape_error() {
        let manifest = parse_manifest(
            r#"
[[job]]
name = "svc"
program_arguments = ["/bin/svc"]

[[job.start_calendar_interval]]
index = 100000000000
hour = 3
"#,
        )
        .unwrap();
        let err = build_job(Path::new("/tmp"), &manifest.jobs[0]).unwrap_err();
        match err {
            AppError::Shape { field, .. } => {
                assert_eq!(field, "StartCalendarInterval[100000000000]")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn manifest_level_problems() {
        assert!(matches!(parse_manifest("prefix = \"/tmp\"\n"), Err(AppError::Manifest(_))));
        assert!(matches!(parse_manifest("[[job]]\nlabel = \"x\"\n"), Err(AppError::Manifest(_))));
        let unknown = parse_manifest("unknown = 1\n[[job]]\nname = \"x\"\n");
        assert!(matches!(unknown, Err(AppError::TomlParse(_))));
    }
}
