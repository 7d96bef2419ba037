//! Where each option lives in the configuration file.
//!
//! [`BINDINGS`] is the schema of the config file: one entry per option that the
//! file may set, naming its section, its key, and how the raw text is coerced.
//! The coercion carries the [`Setting`] constructor for the target field, so a
//! binding whose kind does not match its field does not compile.

use crate::file::ConfigSource;
use crate::types::Setting;

/// How a raw config value is coerced, and which field it lands in.
#[derive(Debug, Clone, Copy)]
pub enum Coerce {
    Text(fn(String) -> Setting),
    Integer(fn(i64) -> Setting),
    Boolean(fn(bool) -> Setting),
}

/// One `(section, key, coercion)` entry of the config file schema.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub section: &'static str,
    pub key: &'static str,
    pub coerce: Coerce,
}

impl Binding {
    /// Fetch and coerce this binding's value. `None` means the file does not
    /// provide a usable value and the previous layer stands.
    pub fn lookup(&self, source: &ConfigSource) -> Option<Setting> {
        match self.coerce {
            Coerce::Text(set) => source.get_string(self.section, self.key).map(set),
            Coerce::Integer(set) => source.get_integer(self.section, self.key).map(set),
            Coerce::Boolean(set) => source.get_boolean(self.section, self.key).map(set),
        }
    }
}

const fn text(section: &'static str, key: &'static str, set: fn(String) -> Setting) -> Binding {
    Binding {
        section,
        key,
        coerce: Coerce::Text(set),
    }
}

const fn integer(section: &'static str, key: &'static str, set: fn(i64) -> Setting) -> Binding {
    Binding {
        section,
        key,
        coerce: Coerce::Integer(set),
    }
}

const fn boolean(section: &'static str, key: &'static str, set: fn(bool) -> Setting) -> Binding {
    Binding {
        section,
        key,
        coerce: Coerce::Boolean(set),
    }
}

pub const CONFIGURATION: &str = "configuration";
pub const DATABASE: &str = "database";

/// Every option the configuration file can set, in application order. When two
/// keys feed the same option, the later one wins.
pub static BINDINGS: &[Binding] = &[
    text(CONFIGURATION, "baseunpackdirectory", Setting::BaseUnpackDirectory),
    text(CONFIGURATION, "temporarydirectory", Setting::TemporaryDirectory),
    integer(CONFIGURATION, "threads", Setting::ThreadCount),
    boolean(CONFIGURATION, "removescandirectory", Setting::RemoveScanDirectory),
    boolean(CONFIGURATION, "bytecounter", Setting::CreateByteCounter),
    integer(CONFIGURATION, "tlshmaximum", Setting::TlshMaximum),
    boolean(CONFIGURATION, "report", Setting::WriteReport),
    boolean(CONFIGURATION, "logging", Setting::UseLogging),
    boolean(DATABASE, "dbconnectionerrorfatal", Setting::DbErrorFatal),
    text(DATABASE, "postgresql_user", Setting::DbUser),
    text(DATABASE, "postgresql_password", Setting::DbPassword),
    text(DATABASE, "postgresql_db", Setting::DbName),
    text(DATABASE, "postgresql_host", Setting::DbHost),
    // Either spelling sets the port; `postgresql_port` wins when both are present.
    integer(DATABASE, "port", Setting::DbPort),
    integer(DATABASE, "postgresql_port", Setting::DbPort),
];
