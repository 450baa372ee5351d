//! Parser for `params.dat`.
//!
//! ```text
//! OGLE-2019-BLG-0001
//!
//! Field          BLG501.01
//! StarNo         40987
//! RA(J2000.0)    17:52:38.61
//! Dec(J2000.0)   -29:47:55.8
//! Remarks
//!
//! Tmax     2458547.934   0.031
//! tau         24.103     0.313
//! ```
//!
//! A header block of `key value...` lines, then one `name value error` line
//! per parameter. `-` marks a value the survey did not report.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Suffix of the synthesized uncertainty key (`tau_err`).
pub const ERR_SUFFIX: &str = "_err";

const HEADER_KEYS: [&str; 5] = ["Field", "StarNo", "RA(J2000.0)", "Dec(J2000.0)", "Remarks"];

/// Structural problem in a data file, located by 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// A reported value and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub err: f64,
}

/// Header block of a parameter file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventHeader {
    pub title: String,
    pub field: Option<String>,
    pub star_no: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    /// Right ascension in decimal degrees.
    pub ra_deg: Option<f64>,
    /// Declination in decimal degrees.
    pub dec_deg: Option<f64>,
    pub remarks: String,
}

/// Parsed parameter file.
///
/// Parameter names are unbounded, so they are kept in a name → measurement
/// map; unreported parameters are present with `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventParameters {
    pub header: EventHeader,
    values: BTreeMap<String, Option<Measurement>>,
}

impl EventParameters {
    /// Value of `name`, or its uncertainty when `name` ends in `_err`.
    ///
    /// `None` when the parameter is absent or was not reported.
    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some(m) = self.measurement(name) {
            return Some(m.value);
        }
        let base = name.strip_suffix(ERR_SUFFIX)?;
        self.measurement(base).map(|m| m.err)
    }

    pub fn measurement(&self, name: &str) -> Option<Measurement> {
        self.values.get(name).copied().flatten()
    }

    /// Whether the file lists `name`, reported or not.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat `name`/`name_err` view, unreported entries omitted.
    pub fn to_flat_map(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        for (name, m) in &self.values {
            if let Some(m) = m {
                out.insert(name.clone(), m.value);
                out.insert(format!("{name}{ERR_SUFFIX}"), m.err);
            }
        }
        out
    }

    /// Parse the contents of a `params.dat` file.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, title) = lines
            .next()
            .ok_or_else(|| ParseError::new(1, "empty parameter file"))?;
        let mut header = EventHeader {
            title: title.to_string(),
            ..EventHeader::default()
        };
        let mut values: BTreeMap<String, Option<Measurement>> = BTreeMap::new();

        for (line_no, line) in lines {
            let (key, rest) = match line.split_once(char::is_whitespace) {
                Some((k, r)) => (k, r.trim()),
                None => (line, ""),
            };

            if HEADER_KEYS.contains(&key) {
                if !values.is_empty() {
                    return Err(ParseError::new(
                        line_no,
                        format!("header key '{key}' after parameter lines"),
                    ));
                }
                parse_header_line(&mut header, key, rest, line_no)?;
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [name, value, err] = fields[..] else {
                return Err(ParseError::new(
                    line_no,
                    format!("expected 'name value error', found {} fields", fields.len()),
                ));
            };
            if values.contains_key(name) {
                return Err(ParseError::new(line_no, format!("duplicate parameter '{name}'")));
            }
            let measurement = match (parse_number(value, line_no)?, parse_number(err, line_no)?) {
                (Some(value), Some(err)) => Some(Measurement { value, err }),
                _ => None,
            };
            values.insert(name.to_string(), measurement);
        }

        Ok(Self { header, values })
    }
}

fn parse_header_line(
    header: &mut EventHeader,
    key: &str,
    value: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let non_empty = (!value.is_empty()).then(|| value.to_string());
    match key {
        "Field" => header.field = non_empty,
        "StarNo" => header.star_no = non_empty,
        "RA(J2000.0)" => {
            header.ra_deg = non_empty
                .as_deref()
                .map(|v| {
                    ra_degrees(v).ok_or_else(|| ParseError::new(line_no, format!("bad RA '{v}'")))
                })
                .transpose()?;
            header.ra = non_empty;
        }
        "Dec(J2000.0)" => {
            header.dec_deg = non_empty
                .as_deref()
                .map(|v| {
                    dec_degrees(v).ok_or_else(|| ParseError::new(line_no, format!("bad Dec '{v}'")))
                })
                .transpose()?;
            header.dec = non_empty;
        }
        "Remarks" => header.remarks = value.to_string(),
        _ => {}
    }
    Ok(())
}

/// `-` is an unreported value.
fn parse_number(token: &str, line_no: usize) -> Result<Option<f64>, ParseError> {
    if token == "-" {
        return Ok(None);
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ParseError::new(
            line_no,
            format!("'{token}' is not a finite number"),
        )),
    }
}

fn sexagesimal(text: &str) -> Option<(bool, f64)> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let mut parts = body.split(':').map(|p| p.parse::<f64>().ok());
    let (a, b, c) = (parts.next()??, parts.next()??, parts.next()??);
    if parts.next().is_some() {
        return None;
    }
    Some((negative, a + b / 60.0 + c / 3600.0))
}

/// `hh:mm:ss.s` → degrees.
pub fn ra_degrees(text: &str) -> Option<f64> {
    match sexagesimal(text)? {
        (false, hours) => Some(15.0 * hours),
        (true, _) => None,
    }
}

/// `±dd:mm:ss.s` → degrees, the sign applying to the whole value.
pub fn dec_degrees(text: &str) -> Option<f64> {
    let (negative, deg) = sexagesimal(text)?;
    Some(if negative { -deg } else { deg })
}
