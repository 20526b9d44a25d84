use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PatientError;

/// Column order of the Patient table, which is also the export header.
pub const PATIENT_COLUMNS: [&str; 7] = [
    "PatientID",
    "Name",
    "DateOfBirth",
    "Gender",
    "Address",
    "PhoneNumber",
    "Email",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(PatientError::InvalidRecord(format!("unknown gender `{}`", other))),
        }
    }
}

/// A generated record before the engine assigns its PatientID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl NewPatient {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }
}

/// A committed Patient row. Only Name is mandatory in the table, so the rest may be
/// absent for rows written by other callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trips_through_text() {
        for gender in Gender::ALL {
            assert_eq!(gender.as_str().parse::<Gender>().unwrap(), gender);
        }
        assert!("male".parse::<Gender>().is_err());
        assert!("Other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_first_name() {
        let patient = NewPatient {
            name: "Sunita Patel".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 6, 15).unwrap(),
            gender: Gender::Female,
            address: "Pune".to_string(),
            phone_number: "9123456789".to_string(),
            email: "sunita1234@gmail.com".to_string(),
        };

        assert_eq!(patient.first_name(), "Sunita");
    }
}
