//! CSV export of the student set.
//!
//! Fixed 8-column layout matching the dashboard table. Fields are written
//! through the csv crate, so embedded commas, quotes and newlines in
//! free-text fields come out RFC 4180 quoted.

use csv::Writer;

use crate::models::Student;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Email",
    "Phone",
    "CF Handle",
    "Current Rating",
    "Max Rating",
    "Last Updated",
    "Status",
];

/// Serialize the full student set to CSV: one header line plus one row per
/// student.
pub fn students_to_csv(students: &[Student]) -> Result<String, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for student in students {
        writer.write_record([
            student.name.as_str(),
            student.email.as_str(),
            student.phone.as_deref().unwrap_or(""),
            student.cf_handle.as_str(),
            &student
                .current_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
            &student
                .max_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
            &student
                .last_updated
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            if student.email_opt_out {
                "Inactive"
            } else {
                "Active"
            },
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // The writer only ever receives valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Export students to a file, returning the row count written.
pub fn write_csv_file(students: &[Student], path: &std::path::Path) -> std::io::Result<usize> {
    let csv = students_to_csv(students).map_err(std::io::Error::other)?;
    std::fs::write(path, csv)?;
    tracing::info!(
        path = %path.display(),
        rows = students.len(),
        "exported students to CSV"
    );
    Ok(students.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, email: &str) -> Student {
        Student {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            cf_handle: "handle".to_string(),
            current_rating: Some(1500),
            max_rating: Some(1600),
            last_updated: Some("2026-08-01T12:00:00Z".parse().unwrap()),
            email_opt_out: false,
        }
    }

    #[test]
    fn test_header_only_for_empty_set() {
        let csv = students_to_csv(&[]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "Name,Email,Phone,CF Handle,Current Rating,Max Rating,Last Updated,Status"
        );
    }

    #[test]
    fn test_n_students_produce_n_plus_one_lines() {
        let students = vec![
            student("A", "a@example.com"),
            student("B", "b@example.com"),
            student("C", "c@example.com"),
        ];
        let csv = students_to_csv(&students).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_every_row_has_eight_fields() {
        let students = vec![student("A", "a@example.com")];
        let csv = students_to_csv(&students).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), 8);
        }
    }

    #[test]
    fn test_embedded_commas_are_quoted() {
        let students = vec![student("Lovelace, Ada", "ada@example.com")];
        let csv = students_to_csv(&students).unwrap();
        assert!(csv.contains("\"Lovelace, Ada\""));

        // And the value survives a round trip.
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Lovelace, Ada");
        assert_eq!(record.len(), 8);
    }

    #[test]
    fn test_status_column() {
        let mut opted_out = student("A", "a@example.com");
        opted_out.email_opt_out = true;
        let csv = students_to_csv(&[student("B", "b@example.com"), opted_out]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].ends_with("Active"));
        assert!(lines[2].ends_with("Inactive"));
    }

    #[test]
    fn test_missing_fields_serialize_empty() {
        let blank = Student {
            id: 9,
            name: "X".to_string(),
            email: "x@example.com".to_string(),
            phone: None,
            cf_handle: "x".to_string(),
            current_rating: None,
            max_rating: None,
            last_updated: None,
            email_opt_out: false,
        };
        let csv = students_to_csv(&[blank]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "");
        assert_eq!(&record[4], "");
        assert_eq!(&record[6], "");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let rows = write_csv_file(&[student("A", "a@example.com")], &path).unwrap();
        assert_eq!(rows, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
