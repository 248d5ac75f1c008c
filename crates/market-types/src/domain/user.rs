use serde::{Deserialize, Serialize};

use super::wire::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: Option<i64>,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `PUT /users/{id}`. Any `id` key in the input is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
}

impl User {
    pub fn from_new(id: i64, new: NewUser) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            age: new.age,
            email: new.email,
            role: new.role,
            phone: new.phone,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.age {
            self.age = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::from_new(
            7,
            NewUser {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                age: Some(36),
                email: "ada@example.com".into(),
                role: "customer".into(),
                phone: Some("+44 20 0000".into()),
            },
        )
    }

    #[test]
    fn partial_patch_keeps_other_fields() {
        let mut user = sample();
        user.apply(UserPatch {
            role: Some("executor".into()),
            ..Default::default()
        });
        assert_eq!(user.role, "executor");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.age, Some(36));
        assert_eq!(user.phone.as_deref(), Some("+44 20 0000"));
    }

    #[test]
    fn patch_ignores_id_and_clears_nullable() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"id": 99, "phone": null, "age": 37}"#).unwrap();
        let mut user = sample();
        user.apply(patch);
        assert_eq!(user.id, 7);
        assert_eq!(user.phone, None);
        assert_eq!(user.age, Some(37));
    }

    #[test]
    fn new_user_requires_core_fields() {
        let missing_email = serde_json::from_str::<NewUser>(
            r#"{"first_name":"A","last_name":"B","role":"customer"}"#,
        );
        assert!(missing_email.is_err());

        let wrong_type = serde_json::from_str::<NewUser>(
            r#"{"first_name":"A","last_name":"B","email":"a@b","role":"r","age":"old"}"#,
        );
        assert!(wrong_type.is_err());
    }
}
