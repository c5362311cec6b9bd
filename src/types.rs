use serde::{Deserialize, Serialize};

/// Raised when a text column holds a value outside a known enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Direction of money flow. Shared by categories and transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl TryFrom<String> for EntryType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            _ => Err(UnknownVariant {
                kind: "entry type",
                value,
            }),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde adapter for calendar dates. Writes `YYYY-MM-DD`; reads either that or
/// an RFC 3339 timestamp, keeping only its date part.
pub mod entry_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::{well_known::Rfc3339, FormatItem},
        macros::format_description,
        Date, OffsetDateTime,
    };

    const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn parse(raw: &str) -> Option<Date> {
        let raw = raw.trim();
        Date::parse(raw, DATE_FORMAT)
            .ok()
            .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|dt| dt.date()))
    }

    pub fn format(date: Date) -> String {
        date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom("date must be formatted as YYYY-MM-DD"))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom("date must be formatted as YYYY-MM-DD")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn entry_date_accepts_plain_and_rfc3339() {
        assert_eq!(entry_date::parse("2024-03-15"), Some(date!(2024 - 03 - 15)));
        assert_eq!(
            entry_date::parse("2024-03-15T22:10:00Z"),
            Some(date!(2024 - 03 - 15))
        );
        assert_eq!(entry_date::parse("15/03/2024"), None);
        assert_eq!(entry_date::format(date!(2024 - 01 - 05)), "2024-01-05");
    }

    #[test]
    fn parses_known_values() {
        assert_eq!(EntryType::try_from("income".to_string()).unwrap(), EntryType::Income);
        assert_eq!(EntryType::try_from("expense".to_string()).unwrap(), EntryType::Expense);
    }

    #[test]
    fn rejects_unknown_value() {
        let err = EntryType::try_from("transfer".to_string()).unwrap_err();
        assert!(err.to_string().contains("transfer"));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&EntryType::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
    }
}
