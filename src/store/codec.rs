//! Line codec for task records.
//!
//! A record is six `;`-separated fields:
//! `assignee;title;description;assigned_date;due_date;completed`.
//! Dates are `YYYY-MM-DD` and the completion flag is the literal `Yes` or
//! `No`. Fields are not escaped, so values carrying the delimiter or a line
//! break are refused by [`encode`] instead of being written.

use crate::error::{TrackerError, TrackerResult};
use crate::types::{DATE_FORMAT, TaskRecord, parse_date};
use chrono::{Datelike, NaiveDate};

pub const DELIMITER: char = ';';
pub const FIELD_COUNT: usize = 6;

const FLAG_YES: &str = "Yes";
const FLAG_NO: &str = "No";

/// Check that a text value can be stored in a single delimited field.
pub fn check_field(field: &'static str, value: &str) -> TrackerResult<()> {
    if value.contains(DELIMITER) {
        return Err(TrackerError::invalid_field(
            field,
            format!("must not contain '{}'", DELIMITER),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(TrackerError::invalid_field(
            field,
            "must not contain line breaks",
        ));
    }
    Ok(())
}

/// Format a date, refusing years that do not fit four digits.
fn encode_date(field: &'static str, date: NaiveDate) -> TrackerResult<String> {
    if !(0..=9999).contains(&date.year()) {
        return Err(TrackerError::invalid_field(
            field,
            format!("year {} is outside 0000-9999", date.year()),
        ));
    }
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Serialize a task to one line, without the trailing newline.
pub fn encode(task: &TaskRecord) -> TrackerResult<String> {
    if task.assignee.trim().is_empty() {
        return Err(TrackerError::invalid_field("assignee", "must not be empty"));
    }
    check_field("assignee", &task.assignee)?;
    check_field("title", &task.title)?;
    check_field("description", &task.description)?;

    let flag = if task.completed { FLAG_YES } else { FLAG_NO };
    let fields = [
        task.assignee.clone(),
        task.title.clone(),
        task.description.clone(),
        encode_date("assigned_date", task.assigned_date)?,
        encode_date("due_date", task.due_date)?,
        flag.to_string(),
    ];
    let separator = DELIMITER.to_string();
    Ok(fields.join(separator.as_str()))
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn decode(line: &str) -> TrackerResult<Option<TaskRecord>> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(TrackerError::malformed(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    if fields[0].trim().is_empty() {
        return Err(TrackerError::malformed("empty assignee"));
    }
    let assigned_date = parse_date(fields[3]).ok_or_else(|| {
        TrackerError::malformed(format!("unparseable assigned date '{}'", fields[3]))
    })?;
    let due_date = parse_date(fields[4])
        .ok_or_else(|| TrackerError::malformed(format!("unparseable due date '{}'", fields[4])))?;
    let completed = match fields[5] {
        FLAG_YES => true,
        FLAG_NO => false,
        other => {
            return Err(TrackerError::malformed(format!(
                "completion flag must be Yes or No, found '{}'",
                other
            )));
        }
    };

    Ok(Some(TaskRecord {
        assignee: fields[0].to_string(),
        title: fields[1].to_string(),
        description: fields[2].to_string(),
        assigned_date,
        due_date,
        completed,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> TaskRecord {
        TaskRecord {
            assignee: "bob".to_string(),
            title: "Write report".to_string(),
            description: "Quarterly numbers".to_string(),
            assigned_date: date(2024, 3, 1),
            due_date: date(2024, 3, 15),
            completed: false,
        }
    }

    #[test]
    fn test_encode_field_order() {
        let line = encode(&sample()).unwrap();
        assert_eq!(line, "bob;Write report;Quarterly numbers;2024-03-01;2024-03-15;No");
    }

    #[test]
    fn test_roundtrip() {
        let mut task = sample();
        assert_eq!(decode(&encode(&task).unwrap()).unwrap(), Some(task.clone()));

        task.completed = true;
        task.title = String::new();
        assert_eq!(decode(&encode(&task).unwrap()).unwrap(), Some(task));
    }

    #[test]
    fn test_blank_line_is_skipped() {
        assert_eq!(decode("").unwrap(), None);
        assert_eq!(decode("   \n").unwrap(), None);
    }

    #[test]
    fn test_tolerates_crlf() {
        let task = decode("bob;T;D;2024-03-01;2024-03-15;Yes\r\n")
            .unwrap()
            .unwrap();
        assert!(task.completed);
        assert_eq!(task.due_date, date(2024, 3, 15));
    }

    #[test]
    fn test_too_few_fields() {
        let err = decode("bob;T;D;2024-03-01;2024-03-15").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedRecord);
    }

    #[test]
    fn test_too_many_fields() {
        let err = decode("bob;T;D;extra;2024-03-01;2024-03-15;No").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedRecord);
    }

    #[test]
    fn test_bad_dates() {
        for line in [
            "bob;T;D;01-03-24;2024-03-15;No",
            "bob;T;D;2024-03-01;2024-13-01;No",
            "bob;T;D;2024-3-1;2024-03-15;No",
        ] {
            let err = decode(line).unwrap_err();
            assert_eq!(err.code(), ErrorCode::MalformedRecord, "line: {}", line);
        }
    }

    #[test]
    fn test_completion_flag_is_exact() {
        for flag in ["yes", " Yes", "Yesterday", "no", ""] {
            let line = format!("bob;T;D;2024-03-01;2024-03-15;{}", flag);
            assert!(decode(&line).is_err(), "flag {:?} should be rejected", flag);
        }
    }

    #[test]
    fn test_encode_rejects_delimiter_and_newlines() {
        let mut task = sample();
        task.title = "a;b".to_string();
        assert_eq!(encode(&task).unwrap_err().code(), ErrorCode::InvalidField);

        let mut task = sample();
        task.description = "line one\nline two".to_string();
        assert_eq!(encode(&task).unwrap_err().code(), ErrorCode::InvalidField);

        let mut task = sample();
        task.assignee = " ".to_string();
        assert_eq!(encode(&task).unwrap_err().code(), ErrorCode::InvalidField);
    }

    #[test]
    fn test_encode_rejects_five_digit_years() {
        let mut task = sample();
        task.due_date = date(10000, 1, 1);
        assert_eq!(encode(&task).unwrap_err().code(), ErrorCode::InvalidField);

        let mut task = sample();
        task.assigned_date = date(-1, 12, 31);
        assert_eq!(encode(&task).unwrap_err().code(), ErrorCode::InvalidField);

        let mut task = sample();
        task.due_date = date(9999, 12, 31);
        assert_eq!(decode(&encode(&task).unwrap()).unwrap(), Some(task));
    }
}
