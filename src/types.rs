use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Comment and like entries are opaque to the client; only their count is shown.
pub type Reference = Value;

/// Server-side record id. The API mostly sends strings, but numeric ids are
/// accepted and normalized to their decimal text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads an id out of an arbitrary JSON value (string or number).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if !text.is_empty() => Some(Self(text.clone())),
            Value::Number(number) => Some(Self(number.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Author or sender: either a populated user document or a bare id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserSummary),
    Id(RecordId),
}

impl UserRef {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            UserRef::Populated(user) => user.id.as_ref(),
            UserRef::Id(id) => Some(id),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            UserRef::Populated(user) => user.username.as_deref().filter(|name| !name.is_empty()),
            UserRef::Id(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A post's category: populated `{_id, name}` or a bare id/slug.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Key(String),
}

impl CategoryRef {
    /// Text shown on the category chip.
    pub fn label(&self) -> &str {
        match self {
            CategoryRef::Populated(category) if !category.name.is_empty() => &category.name,
            CategoryRef::Populated(category) => {
                category.id.as_ref().map(RecordId::as_str).unwrap_or_default()
            }
            CategoryRef::Key(key) => key,
        }
    }

    /// Value the edit form is pre-filled with.
    pub fn form_value(&self) -> &str {
        match self {
            CategoryRef::Populated(category) => {
                category.id.as_ref().map(RecordId::as_str).unwrap_or_default()
            }
            CategoryRef::Key(key) => key,
        }
    }

    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        match self {
            CategoryRef::Populated(category) => {
                category.name.to_lowercase() == wanted
                    || category
                        .id
                        .as_ref()
                        .is_some_and(|id| id.as_str().to_lowercase() == wanted)
            }
            CategoryRef::Key(key) => key.to_lowercase() == wanted,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "null_as_default")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "viewCount", default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Reference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<Reference>,
}

impl Post {
    pub fn author_id(&self) -> Option<&RecordId> {
        self.author.as_ref().and_then(UserRef::id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "null_as_default")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserRef>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Set on messages produced locally by the chat simulation.
    #[serde(skip)]
    pub synthetic: bool,
}

/// The signed-in user. Built from the login response's user record plus the
/// issued token; unknown user fields are carried along in `profile`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Session {
    pub fn from_login(user: Map<String, Value>, token: String) -> Self {
        let id = user
            .get("_id")
            .and_then(RecordId::from_value)
            .or_else(|| user.get("id").and_then(RecordId::from_value));
        let username = user
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let profile = user
            .into_iter()
            .filter(|(key, _)| !matches!(key.as_str(), "_id" | "username" | "token"))
            .collect();
        Self {
            id,
            username,
            token,
            profile,
        }
    }
}

// Request and response payloads

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<Map<String, Value>>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author: &'a RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct PostUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct NewMessage<'a> {
    pub content: &'a str,
    pub sender: &'a RecordId,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ChatMessage>,
}
