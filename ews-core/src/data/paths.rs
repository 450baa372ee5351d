//! Event identity and the survey's directory convention.
//!
//! Layout: `{year}/{field}-{NNNN}/{kind}.dat`
//!
//! The same relative path addresses a file in the local data directory and on
//! the remote archive (the remote prepends its own phase prefix).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default survey field (Galactic bulge).
pub const DEFAULT_FIELD: &str = "blg";

/// Survey phase, determined by the alert year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyPhase {
    OgleII,
    OgleIII,
    OgleIV,
}

impl SurveyPhase {
    /// Phase that published alerts in `year`, if any.
    pub fn for_year(year: i32) -> Option<Self> {
        match year {
            1998..=2000 => Some(Self::OgleII),
            2002..=2009 => Some(Self::OgleIII),
            2011.. => Some(Self::OgleIV),
            _ => None,
        }
    }

    /// Phase number as it appears in archive paths (`ogle4`).
    pub fn number(self) -> u8 {
        match self {
            Self::OgleII => 2,
            Self::OgleIII => 3,
            Self::OgleIV => 4,
        }
    }

    /// Width the event number is zero-padded to.
    pub fn number_width(self) -> usize {
        match self {
            Self::OgleII => 2,
            Self::OgleIII => 3,
            Self::OgleIV => 4,
        }
    }
}

/// Which of the two per-event data products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Model parameters (`params.dat`).
    Params,
    /// Photometry time series (`phot.dat`).
    Photometry,
}

impl DataKind {
    pub const ALL: [DataKind; 2] = [DataKind::Params, DataKind::Photometry];

    pub fn file_name(self) -> &'static str {
        match self {
            DataKind::Params => "params.dat",
            DataKind::Photometry => "phot.dat",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            DataKind::Params => "params",
            DataKind::Photometry => "phot",
        })
    }
}

/// Identity of one event's dataset: (year, field, number). Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EventId {
    year: i32,
    field: String,
    number: u32,
}

impl EventId {
    /// Build an identity. The field is stored lowercase.
    ///
    /// Returns `None` for a zero event number or a field that is empty or not
    /// ASCII alphanumeric (it becomes a path segment).
    pub fn new(year: i32, field: &str, number: u32) -> Option<Self> {
        let field = field.trim().to_ascii_lowercase();
        if number == 0 || field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self {
            year,
            field,
            number,
        })
    }

    /// Identity in the default bulge field.
    pub fn bulge(year: i32, number: u32) -> Option<Self> {
        Self::new(year, DEFAULT_FIELD, number)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> Option<SurveyPhase> {
        SurveyPhase::for_year(self.year)
    }

    /// Zero-padded event number for this event's phase (4 digits when unknown).
    pub fn padded_number(&self) -> String {
        let width = self.phase().map_or(4, SurveyPhase::number_width);
        format!("{:0width$}", self.number, width = width)
    }

    /// Event directory relative to the data root: `{year}/{field}-{NNNN}`.
    pub fn dir(&self) -> String {
        format!("{}/{}-{}", self.year, self.field, self.padded_number())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OGLE-{}-{}-{}",
            self.year,
            self.field.to_uppercase(),
            self.padded_number()
        )
    }
}

/// Relative path of one data product: `{year}/{field}-{NNNN}/{kind}.dat`.
///
/// Assumes a validated [`EventId`]; there are no error cases.
pub fn relative_path(id: &EventId, kind: DataKind) -> String {
    format!("{}/{}", id.dir(), kind.file_name())
}

/// Year encoded in the leading segment of a relative path.
pub fn year_of(relative: &str) -> Option<i32> {
    relative.split('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(SurveyPhase::for_year(1997), None);
        assert_eq!(SurveyPhase::for_year(1998), Some(SurveyPhase::OgleII));
        assert_eq!(SurveyPhase::for_year(2001), None);
        assert_eq!(SurveyPhase::for_year(2005), Some(SurveyPhase::OgleIII));
        assert_eq!(SurveyPhase::for_year(2010), None);
        assert_eq!(SurveyPhase::for_year(2019), Some(SurveyPhase::OgleIV));
    }

    #[test]
    fn ogle4_paths_are_four_digit() {
        let id = EventId::bulge(2019, 7).unwrap();
        assert_eq!(relative_path(&id, DataKind::Params), "2019/blg-0007/params.dat");
        assert_eq!(relative_path(&id, DataKind::Photometry), "2019/blg-0007/phot.dat");
    }

    #[test]
    fn padding_follows_phase() {
        assert_eq!(EventId::bulge(2005, 7).unwrap().padded_number(), "007");
        assert_eq!(EventId::bulge(1999, 7).unwrap().padded_number(), "07");
        assert_eq!(EventId::bulge(1990, 7).unwrap().padded_number(), "0007");
    }

    #[test]
    fn padding_never_truncates() {
        let id = EventId::bulge(1999, 123).unwrap();
        assert_eq!(id.padded_number(), "123");
    }

    #[test]
    fn field_is_lowercased_and_label_uppercased() {
        let id = EventId::new(2019, "LMC", 12).unwrap();
        assert_eq!(id.field(), "lmc");
        assert_eq!(id.to_string(), "OGLE-2019-LMC-0012");
    }

    #[test]
    fn invalid_identity_rejected() {
        assert!(EventId::bulge(2019, 0).is_none());
        assert!(EventId::new(2019, "  ", 1).is_none());
    }

    #[test]
    fn field_cannot_escape_the_event_directory() {
        for field in ["../../../tmp/evil", "blg/x", "..", "b lg", "blg-1", "błg"] {
            assert!(EventId::new(2019, field, 1).is_none(), "{field}");
        }
        assert!(EventId::new(2019, " smc ", 1).is_some());
    }

    #[test]
    fn year_of_reads_leading_segment() {
        assert_eq!(year_of("2019/blg-0001/phot.dat"), Some(2019));
        assert_eq!(year_of("blg-0001/phot.dat"), None);
    }
}
