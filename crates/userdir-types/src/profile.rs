use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub thumbnail: String,
}

/// One user as returned by the directory service.
///
/// Field layout mirrors the service payload (`name.first`, `dob.age`,
/// `nat`, ...); the accessors below give the flattened view the rest of
/// the workspace works with. Extra payload fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: ProfileName,
    pub email: String,
    pub gender: String,
    pub dob: DateOfBirth,
    pub nat: String,
    pub picture: Picture,
}

impl ProfileRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    pub fn age(&self) -> u32 {
        self.dob.age
    }

    pub fn nationality_code(&self) -> &str {
        &self.nat
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.picture.thumbnail
    }
}

/// Top-level body of a directory response. Only `results` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryResponse {
    pub results: Vec<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ResponseInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub results: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_shape() {
        let body = r#"{
            "results": [{
                "gender": "female",
                "name": {"title": "Ms", "first": "Jane", "last": "Doe"},
                "location": {"city": "Austin"},
                "email": "jane.doe@example.com",
                "dob": {"date": "1990-04-01T00:00:00.000Z", "age": 34},
                "nat": "US",
                "picture": {
                    "large": "https://example.com/l.jpg",
                    "thumbnail": "https://example.com/t.jpg"
                }
            }],
            "info": {"seed": "abc", "results": 1, "page": 1, "version": "1.4"}
        }"#;

        let response: DirectoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 1);

        let jane = &response.results[0];
        assert_eq!(jane.full_name(), "Jane Doe");
        assert_eq!(jane.age(), 34);
        assert_eq!(jane.nationality_code(), "US");
        assert_eq!(jane.thumbnail_url(), "https://example.com/t.jpg");
        assert_eq!(response.info.unwrap().seed.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_age_is_rejected() {
        let body = r#"{"results": [{
            "gender": "male",
            "name": {"first": "John", "last": "Roe"},
            "email": "j@example.com",
            "dob": {},
            "nat": "GB",
            "picture": {"thumbnail": "t.jpg"}
        }]}"#;
        assert!(serde_json::from_str::<DirectoryResponse>(body).is_err());
    }
}
