use crate::model::employee::Employee;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema, Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    #[serde(rename = "half-day")]
    #[sqlx(rename = "half-day")]
    #[strum(serialize = "half-day")]
    HalfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub employee_id: i64,
    #[schema(example = "2024-03-01")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "17:30:00")]
    pub check_out: Option<NaiveTime>,
    #[schema(example = 8.5)]
    pub hours_worked: Option<f64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub employee: Option<Employee>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    pub employee_id: i64,
    #[schema(example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "time_of_day::optional")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_of_day::optional")]
    #[schema(value_type = Option<String>, example = "17:30")]
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "time_of_day::nullable")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub check_in: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "time_of_day::nullable")]
    #[schema(value_type = Option<String>, example = "17:30")]
    pub check_out: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<f64>)]
    pub hours_worked: Option<Option<f64>>,
    pub status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub employee_id: i64,
    #[serde(deserialize_with = "time_of_day::required")]
    #[schema(value_type = String, example = "09:00")]
    pub check_in_time: NaiveTime,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    pub employee_id: i64,
    #[serde(deserialize_with = "time_of_day::required")]
    #[schema(value_type = String, example = "17:30")]
    pub check_out_time: NaiveTime,
}

/// Ranged listing; both bounds are whole calendar days.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceRange {
    /// First day (`YYYY-MM-DD` or an ISO timestamp)
    pub start_date: Option<String>,
    /// Last day, inclusive
    pub end_date: Option<String>,
}

/// Clock times arrive as `HH:MM` from the dashboard and `HH:MM:SS` from other clients.
pub mod time_of_day {
    use super::*;

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
            .ok()
    }

    pub fn required<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time of day '{}', expected HH:MM", raw))
        })
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid time of day '{}', expected HH:MM", raw))
            }),
            None => Ok(None),
        }
    }

    pub fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<NaiveTime>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_accepts_minutes_and_seconds() {
        assert_eq!(
            time_of_day::parse("09:00"),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            time_of_day::parse("17:30:15"),
            NaiveTime::from_hms_opt(17, 30, 15)
        );
        assert_eq!(time_of_day::parse("9 o'clock"), None);
    }

    #[test]
    fn check_in_body_uses_camel_case() {
        let body: CheckIn =
            serde_json::from_str(r#"{"employeeId": 3, "checkInTime": "08:45"}"#).unwrap();
        assert_eq!(body.employee_id, 3);
        assert_eq!(body.check_in_time, NaiveTime::from_hms_opt(8, 45, 0).unwrap());
    }

    #[test]
    fn half_day_status_uses_hyphen() {
        let status: AttendanceStatus = serde_json::from_str(r#""half-day""#).unwrap();
        assert_eq!(status, AttendanceStatus::HalfDay);
        assert_eq!(status.to_string(), "half-day");
    }

    #[test]
    fn update_body_tells_null_from_absent() {
        let body: UpdateAttendance =
            serde_json::from_str(r#"{"checkOut": null, "notes": "late bus"}"#).unwrap();
        assert_eq!(body.check_out, Some(None));
        assert_eq!(body.check_in, None);
        assert_eq!(body.notes, Some(Some("late bus".to_string())));
        assert_eq!(body.hours_worked, None);
    }
}
