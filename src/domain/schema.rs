//! Static field tables for every launchd construct.
//!
//! Each construct maps plist keys to the [`FieldKind`] their values must satisfy.
//! Tables are plain `static` slices, so lookups need no synchronization.

use std::fmt;
use std::str::FromStr;

use super::AppError;
use super::naming::camel_case;

/// A named schema scope with its own field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Job,
    KeepAlive,
    CalendarInterval,
    ResourceLimits,
    MachService,
    Socket,
    InetdCompatibility,
}

impl Construct {
    pub const ALL: [Construct; 7] = [
        Construct::Job,
        Construct::KeepAlive,
        Construct::CalendarInterval,
        Construct::ResourceLimits,
        Construct::MachService,
        Construct::Socket,
        Construct::InetdCompatibility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Construct::Job => "job",
            Construct::KeepAlive => "keep-alive",
            Construct::CalendarInterval => "calendar-interval",
            Construct::ResourceLimits => "resource-limits",
            Construct::MachService => "mach-service",
            Construct::Socket => "socket",
            Construct::InetdCompatibility => "inetd-compatibility",
        }
    }

    /// Declared fields in table order.
    pub fn fields(self) -> &'static [(&'static str, FieldKind)] {
        match self {
            Construct::Job => tables::JOB_FIELDS,
            Construct::KeepAlive => tables::KEEP_ALIVE_FIELDS,
            Construct::CalendarInterval => tables::CALENDAR_INTERVAL_FIELDS,
            Construct::ResourceLimits => tables::RESOURCE_LIMIT_FIELDS,
            Construct::MachService => tables::MACH_SERVICE_FIELDS,
            Construct::Socket => tables::SOCKET_FIELDS,
            Construct::InetdCompatibility => tables::INETD_COMPATIBILITY_FIELDS,
        }
    }

    /// Resolve a field given in DSL or key spelling to its canonical key and kind.
    pub fn resolve(self, name: &str) -> Result<(&'static str, FieldKind), AppError> {
        let wanted = camel_case(name);
        self.fields()
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&wanted))
            .copied()
            .ok_or_else(|| AppError::NotAField {
                construct: self.name().to_string(),
                field: name.to_string(),
            })
    }

    /// Kind of a field, if declared.
    pub fn kind_of(self, name: &str) -> Option<FieldKind> {
        self.resolve(name).ok().map(|(_, kind)| kind)
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Construct {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Construct::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| AppError::UnknownConstruct(s.to_string()))
    }
}

/// Declared shape a field's value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Bool,
    Integer,
    ArrayOfStrings,
    MapOfBools,
    MapOfStrings,
    BoolOrStringOrArrayOfStrings,
    BoolOrNestedDocument(Construct),
    NestedDocument(Construct),
    ArrayOfNestedDocuments(Construct),
    MapOfBoolOrNestedDocuments(Construct),
}

impl FieldKind {
    /// Construct that owns the schema of nested values, for block-capable kinds.
    pub fn nested_construct(self) -> Option<Construct> {
        match self {
            FieldKind::BoolOrNestedDocument(c)
            | FieldKind::NestedDocument(c)
            | FieldKind::ArrayOfNestedDocuments(c)
            | FieldKind::MapOfBoolOrNestedDocuments(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => f.write_str("string"),
            FieldKind::Bool => f.write_str("boolean"),
            FieldKind::Integer => f.write_str("integer"),
            FieldKind::ArrayOfStrings => f.write_str("array of strings"),
            FieldKind::MapOfBools => f.write_str("dictionary of booleans"),
            FieldKind::MapOfStrings => f.write_str("dictionary of strings"),
            FieldKind::BoolOrStringOrArrayOfStrings => {
                f.write_str("boolean, string, or array of strings")
            }
            FieldKind::BoolOrNestedDocument(c) => write!(f, "boolean or {} dictionary", c),
            FieldKind::NestedDocument(c) => write!(f, "{} dictionary", c),
            FieldKind::ArrayOfNestedDocuments(c) => write!(f, "array of {} dictionaries", c),
            FieldKind::MapOfBoolOrNestedDocuments(c) => {
                write!(f, "dictionary of booleans or {} dictionaries", c)
            }
        }
    }
}

mod tables {
    use super::Construct;
    use super::FieldKind::{self, *};

    pub(super) static JOB_FIELDS: &[(&str, FieldKind)] = &[
        ("Label", String),
        ("UserName", String),
        ("GroupName", String),
        ("LimitLoadToSessionType", String),
        ("Program", String),
        ("RootDirectory", String),
        ("WorkingDirectory", String),
        ("StandardInPath", String),
        ("StandardOutPath", String),
        ("StandardErrorPath", String),
        ("Disabled", Bool),
        ("EnableGlobbing", Bool),
        ("EnableTransactions", Bool),
        ("OnDemand", Bool),
        ("RunAtLoad", Bool),
        ("InitGroups", Bool),
        ("StartOnMount", Bool),
        ("Debug", Bool),
        ("WaitForDebugger", Bool),
        ("AbandonProcessGroup", Bool),
        ("HopefullyExitsFirst", Bool),
        ("HopefullyExitsLast", Bool),
        ("LowPriorityIO", Bool),
        ("LaunchOnlyOnce", Bool),
        ("Umask", Integer),
        ("TimeOut", Integer),
        ("ExitTimeOut", Integer),
        ("ThrottleInterval", Integer),
        ("StartInterval", Integer),
        ("Nice", Integer),
        ("LimitLoadToHosts", ArrayOfStrings),
        ("LimitLoadFromHosts", ArrayOfStrings),
        ("ProgramArguments", ArrayOfStrings),
        ("WatchPaths", ArrayOfStrings),
        ("QueueDirectories", ArrayOfStrings),
        ("EnvironmentVariables", MapOfStrings),
        ("KeepAlive", BoolOrNestedDocument(Construct::KeepAlive)),
        ("StartCalendarInterval", ArrayOfNestedDocuments(Construct::CalendarInterval)),
        ("SoftResourceLimits", NestedDocument(Construct::ResourceLimits)),
        ("HardResourceLimits", NestedDocument(Construct::ResourceLimits)),
        ("MachServices", MapOfBoolOrNestedDocuments(Construct::MachService)),
        ("Sockets", ArrayOfNestedDocuments(Construct::Socket)),
        ("inetdCompatibility", NestedDocument(Construct::InetdCompatibility)),
    ];

    pub(super) static KEEP_ALIVE_FIELDS: &[(&str, FieldKind)] = &[
        ("SuccessfulExit", Bool),
        ("NetworkState", Bool),
        ("Crashed", Bool),
        ("PathState", MapOfBools),
        ("OtherJobEnabled", MapOfBools),
        ("AfterInitialDemand", MapOfBools),
    ];

    pub(super) static CALENDAR_INTERVAL_FIELDS: &[(&str, FieldKind)] = &[
        ("Minute", Integer),
        ("Hour", Integer),
        ("Day", Integer),
        ("Weekday", Integer),
        ("Month", Integer),
    ];

    pub(super) static RESOURCE_LIMIT_FIELDS: &[(&str, FieldKind)] = &[
        ("Core", Integer),
        ("CPU", Integer),
        ("Data", Integer),
        ("FileSize", Integer),
        ("MemoryLock", Integer),
        ("NumberOfFiles", Integer),
        ("NumberOfProcesses", Integer),
        ("ResidentSetSize", Integer),
        ("Stack", Integer),
    ];

    pub(super) static MACH_SERVICE_FIELDS: &[(&str, FieldKind)] =
        &[("ResetAtClose", Bool), ("HideUntilCheckIn", Bool)];

    pub(super) static SOCKET_FIELDS: &[(&str, FieldKind)] = &[
        ("SockType", String),
        ("SockPassive", Bool),
        ("SockNodeName", String),
        ("SockServiceName", String),
        ("SockFamily", String),
        ("SockProtocol", String),
        ("SockPathName", String),
        ("SecureSocketWithKey", String),
        ("SockPathMode", Integer),
        ("Bonjour", BoolOrStringOrArrayOfStrings),
        ("MulticastGroup", String),
    ];

    pub(super) static INETD_COMPATIBILITY_FIELDS: &[(&str, FieldKind)] = &[("Wait", Bool)];
}
