use anyhow::{Result, bail};

/// A backend specific formatter producing the header and record lines for one
/// target store's text conventions.
///
/// Formatters are stateless; a single value can format any number of records.
/// For every backend, a header's column count matches the field count of each
/// record line emitted into the same stream, so a reader can always split the
/// stream by the backend's delimiter.
pub trait BackendFormat {
    /// Backend name; output files are named `<name>_data` and `<name>_query`.
    fn name(&self) -> &'static str;

    /// Field delimiter, used when verifying an emitted stream.
    fn delimiter(&self) -> u8;

    fn write_header(&self) -> String;

    fn query_header(&self) -> String;

    /// One ingested data point.
    fn write_record(&self, timestamp: u64, value: u64) -> String;

    /// One range query with `left <= right`.
    fn query_record(&self, left: u64, right: u64) -> String;
}

/// Comma separated records, the shape the leveldb ingestion scripts expect.
pub struct LevelDbFormat;

impl BackendFormat for LevelDbFormat {
    fn name(&self) -> &'static str {
        "leveldb"
    }

    fn delimiter(&self) -> u8 {
        b','
    }

    fn write_header(&self) -> String {
        "timestamp,data\n".to_string()
    }

    fn query_header(&self) -> String {
        "l,r\n".to_string()
    }

    fn write_record(&self, timestamp: u64, value: u64) -> String {
        format!("{timestamp},{value}\n")
    }

    fn query_record(&self, left: u64, right: u64) -> String {
        format!("{left},{right}\n")
    }
}

/// Tab separated records, ready for mariadb's LOAD DATA INFILE.
pub struct MariaDbFormat;

impl BackendFormat for MariaDbFormat {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn delimiter(&self) -> u8 {
        b'\t'
    }

    fn write_header(&self) -> String {
        "timestamp\tdata\n".to_string()
    }

    fn query_header(&self) -> String {
        "l\tr\n".to_string()
    }

    fn write_record(&self, timestamp: u64, value: u64) -> String {
        format!("{timestamp}\t{value}\n")
    }

    fn query_record(&self, left: u64, right: u64) -> String {
        format!("{left}\t{right}\n")
    }
}

/// Space separated records in the influxdb line protocol field order: the
/// value field comes before the timestamp.
pub struct InfluxDbFormat;

impl BackendFormat for InfluxDbFormat {
    fn name(&self) -> &'static str {
        "influxdb"
    }

    fn delimiter(&self) -> u8 {
        b' '
    }

    fn write_header(&self) -> String {
        "measurement data timestamp\n".to_string()
    }

    fn query_header(&self) -> String {
        "start stop\n".to_string()
    }

    fn write_record(&self, timestamp: u64, value: u64) -> String {
        format!("bench data={value} {timestamp}\n")
    }

    fn query_record(&self, left: u64, right: u64) -> String {
        format!("{left} {right}\n")
    }
}

/// The backends the generator can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    LevelDb,
    MariaDb,
    InfluxDb,
}

impl Backend {
    /// All backends, in the order the generator emits them.
    pub fn all() -> [Backend; 3] {
        [Backend::LevelDb, Backend::MariaDb, Backend::InfluxDb]
    }

    /// Create a Backend by parsing the command line argument naming it
    pub fn from_arg(arg: &str) -> Result<Backend> {
        match arg.trim().to_ascii_lowercase().as_str() {
            "leveldb" => Ok(Backend::LevelDb),
            "mariadb" => Ok(Backend::MariaDb),
            "influxdb" | "influx" => Ok(Backend::InfluxDb),
            _ => bail!("Unknown backend '{arg}' (expected leveldb, mariadb or influxdb)"),
        }
    }

    pub fn format(&self) -> &'static dyn BackendFormat {
        match self {
            Backend::LevelDb => &LevelDbFormat,
            Backend::MariaDb => &MariaDbFormat,
            Backend::InfluxDb => &InfluxDbFormat,
        }
    }
}
