//! Parsers for `/proc/schedstat`.
//!
//! These are pure functions over the file content, so every layout can be
//! exercised with string inputs. Any inconsistency between a line and the
//! active schema is an error: a misaligned counter would silently report
//! wrong numbers.
//!
//! Format (version 17):
//!
//! ```text
//! version 17
//! timestamp 4295269990
//! cpu0 0 0 27356 6794 18233 11072 2905811396 386283290 20342
//! domain0 SMT 00000003 0 0 0 0 0 0 0 0 0 0 0 ...
//! ```

use super::schema::{DEFAULT_VERSION, FieldSchema, SchemaVersion};
use crate::model::{CounterMap, CpuRecord, CpuTable, DomainRecord, Snapshot};

/// Error type for schedstat parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// `version` line names a layout outside {15, 16, 17}.
    UnsupportedSchemaVersion(i64),
    /// `version` line without a readable integer.
    MalformedVersion { line: String },
    /// Domain line that does not fit the active schema.
    MalformedDomainLine {
        line_no: usize,
        version: SchemaVersion,
        message: String,
    },
    /// CPU line with a non-integer counter.
    MalformedCpuLine { line_no: usize, message: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnsupportedSchemaVersion(v) => {
                write!(f, "Unsupported schedstat version {}", v)
            }
            ParseError::MalformedVersion { line } => {
                write!(f, "malformed version line: '{}'", line)
            }
            ParseError::MalformedDomainLine {
                line_no,
                version,
                message,
            } => write!(
                f,
                "malformed domain line {} (schema v{}): {}",
                line_no, version, message
            ),
            ParseError::MalformedCpuLine { line_no, message } => {
                write!(f, "malformed cpu line {}: {}", line_no, message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

fn is_version_line(line: &str) -> bool {
    line.split_whitespace().next() == Some("version")
}

fn is_domain_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|t| t.starts_with("domain"))
}

fn is_cpu_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|t| t.starts_with("cpu") && !t.starts_with("cpufreq"))
}

/// Detects the schema version from the first `version` line.
///
/// Input without a `version` line is treated as version 15.
pub fn detect_version(content: &str) -> Result<SchemaVersion, ParseError> {
    let Some(line) = content.lines().find(|l| is_version_line(l)) else {
        return Ok(DEFAULT_VERSION);
    };

    let raw: i64 = line
        .split_whitespace()
        .nth(1)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| ParseError::MalformedVersion {
            line: line.trim().to_string(),
        })?;

    SchemaVersion::from_raw(raw).ok_or(ParseError::UnsupportedSchemaVersion(raw))
}

/// Decodes one `domainN` line against `schema`.
///
/// `line_no` is only used for error reporting.
pub fn decode_domain_line(
    line: &str,
    line_no: usize,
    schema: &FieldSchema,
) -> Result<DomainRecord, ParseError> {
    let malformed = |message: String| ParseError::MalformedDomainLine {
        line_no,
        version: schema.version,
        message,
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < schema.value_offset {
        return Err(malformed(format!(
            "expected {} leading tokens, got {}",
            schema.value_offset,
            tokens.len()
        )));
    }

    let values = &tokens[schema.value_offset..];
    if values.len() != schema.fields.len() {
        return Err(malformed(format!(
            "expected {} counters, got {}",
            schema.fields.len(),
            values.len()
        )));
    }

    let mut counters = CounterMap::with_capacity(schema.fields.len());
    for (name, token) in schema.fields.iter().zip(values) {
        let value: u64 = token
            .parse()
            .map_err(|_| malformed(format!("invalid {} '{}'", name, token)))?;
        counters.insert(*name, value);
    }

    Ok(DomainRecord { counters })
}

/// Decodes one `cpuN` line into its label and raw counters.
pub fn decode_cpu_line(line: &str, line_no: usize) -> Result<CpuRecord, ParseError> {
    let mut tokens = line.split_whitespace();
    let label = tokens
        .next()
        .ok_or_else(|| ParseError::MalformedCpuLine {
            line_no,
            message: "empty line".to_string(),
        })?
        .to_string();

    let values = tokens
        .enumerate()
        .map(|(idx, token)| {
            token.parse::<u64>().map_err(|_| ParseError::MalformedCpuLine {
                line_no,
                message: format!("{} field {}: invalid value '{}'", label, idx, token),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CpuRecord { label, values })
}

/// Parses the `timestamp` line, if any.
fn parse_kernel_timestamp(content: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("timestamp"), Some(v)) => v.parse().ok(),
            _ => None,
        }
    })
}

/// Parses full `/proc/schedstat` content into a [`Snapshot`].
///
/// The version is resolved before any domain line is touched, so an
/// unsupported layout never reaches the domain decoder.
pub fn parse_schedstat(content: &str) -> Result<Snapshot, ParseError> {
    let version = detect_version(content)?;
    let schema = version.schema();

    let mut domains = Vec::new();
    let mut cpus = CpuTable::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || is_version_line(line) {
            continue;
        }
        let line_no = idx + 1;

        if is_domain_line(line) {
            domains.push(decode_domain_line(line, line_no, schema)?);
        } else if is_cpu_line(line) {
            cpus.insert(decode_cpu_line(line, line_no)?);
        }
    }

    Ok(Snapshot::new(
        version,
        domains,
        cpus,
        parse_kernel_timestamp(content),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Domain line with `count` counters 10, 20, 30, ...
    fn domain_line(prefix: &str, count: usize) -> String {
        let values: Vec<String> = (1..=count).map(|i| (i * 10).to_string()).collect();
        format!("{} {}", prefix, values.join(" "))
    }

    #[test]
    fn test_detect_version() {
        assert_eq!(
            detect_version("version 15\ntimestamp 1\n").unwrap(),
            SchemaVersion::V15
        );
        assert_eq!(detect_version("version 16\n").unwrap(), SchemaVersion::V16);
        assert_eq!(detect_version("version 17\n").unwrap(), SchemaVersion::V17);
    }

    #[test]
    fn test_detect_version_default() {
        assert_eq!(detect_version("cpu0 1 2 3\n").unwrap(), SchemaVersion::V15);
        assert_eq!(detect_version("").unwrap(), SchemaVersion::V15);
    }

    #[test]
    fn test_detect_version_first_line_wins() {
        let content = "timestamp 5\nversion 16\nversion 17\n";
        assert_eq!(detect_version(content).unwrap(), SchemaVersion::V16);
    }

    #[test]
    fn test_detect_version_unsupported() {
        assert_eq!(
            detect_version("version 99\n"),
            Err(ParseError::UnsupportedSchemaVersion(99))
        );
        assert_eq!(
            detect_version("version 14\n"),
            Err(ParseError::UnsupportedSchemaVersion(14))
        );
    }

    #[test]
    fn test_detect_version_malformed() {
        assert!(matches!(
            detect_version("version abc\n"),
            Err(ParseError::MalformedVersion { .. })
        ));
        assert!(matches!(
            detect_version("version\n"),
            Err(ParseError::MalformedVersion { .. })
        ));
    }

    #[test]
    fn test_decode_domain_v15_idle_first() {
        let line = domain_line("domain0 3", 36);
        let record = decode_domain_line(&line, 1, SchemaVersion::V15.schema()).unwrap();

        assert_eq!(record.get("lb_count_idle"), Some(10));
        assert_eq!(record.get("lb_balance_idle"), Some(20));
        assert_eq!(record.get("lb_failed_idle"), Some(30));
        assert_eq!(record.get("lb_count_not_idle"), Some(90));
        assert_eq!(record.get("ttwu_move_balance"), Some(360));
    }

    #[test]
    fn test_decode_domain_v16_not_idle_first() {
        let line = domain_line("domain0 3", 36);
        let record = decode_domain_line(&line, 1, SchemaVersion::V16.schema()).unwrap();

        assert_eq!(record.get("lb_count_not_idle"), Some(10));
        assert_eq!(record.get("lb_balance_not_idle"), Some(20));
        assert_eq!(record.get("lb_failed_not_idle"), Some(30));
        assert_eq!(record.get("lb_count_idle"), Some(90));
        assert_eq!(record.get("ttwu_move_balance"), Some(360));
    }

    #[test]
    fn test_decode_domain_v17_imbalance_split() {
        let line = domain_line("domain0 MC 000000ff", 45);
        let record = decode_domain_line(&line, 1, SchemaVersion::V17.schema()).unwrap();

        assert_eq!(record.counters.len(), 45);
        assert_eq!(record.get("lb_count_not_idle"), Some(10));
        assert_eq!(record.get("lb_imbalance_load_not_idle"), Some(40));
        assert_eq!(record.get("lb_imbalance_util_not_idle"), Some(50));
        assert_eq!(record.get("lb_imbalance_task_not_idle"), Some(60));
        assert_eq!(record.get("lb_imbalance_misfit_not_idle"), Some(70));
        assert_eq!(record.get("lb_imbalance_not_idle"), None);
        assert_eq!(record.get("lb_count_idle"), Some(120));
    }

    #[test]
    fn test_decode_domain_v17_line_under_v16_fails() {
        // Extra name token plus nine extra counters must not be silently truncated.
        let line = domain_line("domain0 MC 000000ff", 45);
        let err = decode_domain_line(&line, 7, SchemaVersion::V16.schema()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedDomainLine { line_no: 7, .. }
        ));
    }

    #[test]
    fn test_decode_domain_too_few_counters() {
        let line = domain_line("domain0 3", 35);
        let err = decode_domain_line(&line, 2, SchemaVersion::V15.schema()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed domain line 2 (schema v15): expected 36 counters, got 35"
        );
    }

    #[test]
    fn test_decode_domain_invalid_token() {
        let mut line = domain_line("domain0 3", 35);
        line.push_str(" x");
        let err = decode_domain_line(&line, 1, SchemaVersion::V15.schema()).unwrap_err();
        assert!(err.to_string().contains("invalid ttwu_move_balance 'x'"));
    }

    #[test]
    fn test_decode_domain_missing_offset_tokens() {
        let err = decode_domain_line("domain0", 1, SchemaVersion::V17.schema()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDomainLine { .. }));
    }

    #[test]
    fn test_decode_cpu_line() {
        let line = "cpu3 0 0 27356 6794 18233 11072 2905811396 386283290 20342";
        let record = decode_cpu_line(line, 1).unwrap();
        assert_eq!(record.label, "cpu3");
        assert_eq!(
            record.values,
            vec![0, 0, 27356, 6794, 18233, 11072, 2905811396, 386283290, 20342]
        );
    }

    #[test]
    fn test_decode_cpu_line_invalid() {
        let err = decode_cpu_line("cpu0 1 two 3", 4).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedCpuLine {
                line_no: 4,
                message: "cpu0 field 1: invalid value 'two'".to_string()
            }
        );
    }

    #[test]
    fn test_parse_schedstat_v15() {
        let content = format!(
            "version 15\ntimestamp 4294892296\n\
             cpu0 1 2 3 4 5 6 7 8\n{}\ncpu1 8 7 6 5 4 3 2 1\n{}\n",
            domain_line("domain0 00000003", 36),
            domain_line("domain1 0000000f", 36),
        );
        let snapshot = parse_schedstat(&content).unwrap();

        assert_eq!(snapshot.version(), SchemaVersion::V15);
        assert_eq!(snapshot.kernel_timestamp(), Some(4294892296));
        assert_eq!(snapshot.domains().len(), 2);
        assert_eq!(snapshot.cpus().len(), 2);
        assert_eq!(snapshot.cpus().first().unwrap().label, "cpu0");
        assert_eq!(
            snapshot.cpus().get("cpu1").unwrap().values,
            vec![8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_parse_schedstat_skips_cpufreq_and_blank() {
        let content = "version 16\n\ncpufreq 1 2 3\n   \ncpu0 1 2\nfoo bar\n";
        let snapshot = parse_schedstat(content).unwrap();

        assert_eq!(snapshot.cpus().len(), 1);
        assert!(snapshot.cpus().get("cpufreq").is_none());
        assert!(snapshot.domains().is_empty());
        assert_eq!(snapshot.kernel_timestamp(), None);
    }

    #[test]
    fn test_parse_schedstat_unsupported_before_domains() {
        // The domain line is garbage; the version error must surface first.
        let content = "version 99\ncpu0 1 2 3\ndomain0 garbage\n";
        assert_eq!(
            parse_schedstat(content).unwrap_err(),
            ParseError::UnsupportedSchemaVersion(99)
        );
    }

    #[test]
    fn test_parse_schedstat_bad_domain_line_fails_whole_read() {
        let content = format!(
            "version 15\n{}\ndomain1 3 1 2 3\n",
            domain_line("domain0 3", 36)
        );
        let err = parse_schedstat(&content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedDomainLine { line_no: 3, .. }
        ));
    }

    #[test]
    fn test_parse_schedstat_domains_share_keys() {
        let content = format!(
            "version 17\n{}\n{}\n",
            domain_line("domain0 SMT 00000003", 45),
            domain_line("domain1 MC 000000ff", 45),
        );
        let snapshot = parse_schedstat(&content).unwrap();
        let first: Vec<_> = snapshot.domains()[0].counters.keys().collect();
        let second: Vec<_> = snapshot.domains()[1].counters.keys().collect();
        assert_eq!(first, second);
    }
}
