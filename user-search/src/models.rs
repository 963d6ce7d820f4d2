//! Record and user types shared by the server and the client

use serde::{Deserialize, Serialize};

/// A person as stored in the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub gender: String,
    pub about: String,
}

impl Record {
    /// First and last name joined by a single space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A search result
///
/// Wire format: `{"Id", "Name", "Age", "About", "Gender"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub about: String,
    pub gender: String,
}

impl From<Record> for User {
    fn from(record: Record) -> Self {
        let name = record.full_name();
        Self {
            id: record.id,
            name,
            age: record.age,
            about: record.about,
            gender: record.gender,
        }
    }
}

/// Users returned by one search call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            id: 7,
            first_name: "Leann".to_string(),
            last_name: "Travis".to_string(),
            age: 34,
            gender: "female".to_string(),
            about: "Lorem magna dolore et velit ut officia.\n".to_string(),
        }
    }

    #[test]
    fn test_user_from_record_joins_name() {
        let user = User::from(record());
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Leann Travis");
        assert_eq!(user.age, 34);
        assert_eq!(user.gender, "female");
        assert_eq!(user.about, "Lorem magna dolore et velit ut officia.\n");
    }

    #[test]
    fn test_user_wire_field_names() {
        let value = serde_json::to_value(User::from(record())).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["Id", "Name", "Age", "About", "Gender"] {
            assert!(keys.contains(&key), "missing {key} in {keys:?}");
        }
    }

    #[test]
    fn test_users_survive_json() {
        let users = vec![User::from(record()), User::from(record())];
        let json = serde_json::to_vec(&users).unwrap();
        let decoded: Vec<User> = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, users);
    }
}
