use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Registration dates arrive as day/month/year text, e.g. "25/01/2021".
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One registered society. String fields may be empty when the source cell
/// was blank; the registration date is mandatory and validated at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub society: String,
    pub state: String,
    pub district: String,
    pub sector: String,
    pub registered_on: NaiveDate,
}

/// Row shape of the upstream CSV export, before date validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "Name of Society", default)]
    pub society: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "District", default)]
    pub district: String,
    #[serde(rename = "Sector Type", default)]
    pub sector: String,
    #[serde(rename = "Date of Registration", default)]
    pub registered_on: String,
}

/// Selects one of the string fields for the generic calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Society,
    State,
    District,
    Sector,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Society => "Name of Society",
            Field::State => "State",
            Field::District => "District",
            Field::Sector => "Sector Type",
        }
    }
}

impl Record {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Society => &self.society,
            Field::State => &self.state,
            Field::District => &self.district,
            Field::Sector => &self.sector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_format_accepts_day_month_year() {
        let parsed = NaiveDate::parse_from_str("25/01/2021", DATE_FORMAT).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2021, 1, 25).unwrap());
    }

    #[test]
    fn date_format_rejects_impossible_calendar_dates() {
        assert!(NaiveDate::parse_from_str("31/02/2021", DATE_FORMAT).is_err());
    }

    #[test]
    fn field_selects_the_named_column() {
        let record = Record {
            society: "Sunrise Dairy".to_string(),
            state: "Kerala".to_string(),
            district: "Ernakulam".to_string(),
            sector: "Dairy".to_string(),
            registered_on: NaiveDate::from_ymd_opt(2021, 1, 25).unwrap(),
        };

        assert_eq!(record.field(Field::Society), "Sunrise Dairy");
        assert_eq!(record.field(Field::State), "Kerala");
        assert_eq!(record.field(Field::District), "Ernakulam");
        assert_eq!(record.field(Field::Sector), "Dairy");
    }
}
