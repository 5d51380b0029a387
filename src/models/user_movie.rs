use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the hosted `movies` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMovieRecord {
    /// Row id; the table may use integer or uuid keys
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "photo")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the table assigns `id` and `created_at`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUserMovie {
    pub title: String,
    pub year: i32,
    #[serde(rename = "photo")]
    pub photo_url: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserialization() {
        let json = r#"{
            "id": 12,
            "title": "My Indie Film",
            "year": 2024,
            "photo": "https://example.com/poster.jpg",
            "description": null,
            "created_at": "2024-05-01T12:30:00.123456+00:00"
        }"#;

        let record: UserMovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, json!(12));
        assert_eq!(record.year, Some(2024));
        assert_eq!(
            record.photo_url.as_deref(),
            Some("https://example.com/poster.jpg")
        );
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_row_without_title_keeps_the_list() {
        let json = r#"[
            {"id": 1, "title": "Heat", "year": 1995, "created_at": "2024-05-02T08:00:00+00:00"},
            {"id": 2, "title": null, "year": null, "created_at": "2024-05-01T08:00:00+00:00"},
            {"id": 3, "created_at": "2024-04-30T08:00:00+00:00"}
        ]"#;

        let records: Vec<UserMovieRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title.as_deref(), Some("Heat"));
        assert_eq!(records[1].title, None);
        assert_eq!(records[2].title, None);
    }

    #[test]
    fn test_new_movie_serializes_table_columns() {
        let movie = NewUserMovie {
            title: "Heat".to_string(),
            year: 1995,
            photo_url: None,
            description: Some("Crime".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&movie).unwrap(),
            json!({
                "title": "Heat",
                "year": 1995,
                "photo": null,
                "description": "Crime"
            })
        );
    }
}
