pub const MAIN_REF: &str = "refs/heads/main";

const UNKNOWN_REPOSITORY: &str = "Unknown Repository";
const NO_COMMIT_MESSAGE: &str = "No commit message";
const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
}

/// Subset of the GitHub `push` event payload. Every field is optional, so
/// `ping` and other events deserialize too and are later skipped. A field of
/// unexpected shape reads as absent.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref", default, deserialize_with = "lenient")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(default, deserialize_with = "lenient")]
    pub head_commit: Option<Commit>,
}

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = <serde_json::Value as serde::Deserialize>::deserialize(de)?;
    // Derived structs also accept sequences; no field here is ever an array.
    if value.is_array() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|s| !s.is_empty()).unwrap_or(fallback)
}

impl PushEvent {
    /// Substring match, so `refs/heads/main-next` qualifies as well.
    pub fn is_main_push(&self) -> bool {
        self.reference
            .as_deref()
            .map_or(false, |reference| reference.contains(MAIN_REF))
    }

    pub fn repository_name(&self) -> &str {
        or_fallback(
            self.repository
                .as_ref()
                .and_then(|repo| repo.full_name.as_deref()),
            UNKNOWN_REPOSITORY,
        )
    }

    pub fn commit_message(&self) -> &str {
        or_fallback(
            self.head_commit
                .as_ref()
                .and_then(|commit| commit.message.as_deref()),
            NO_COMMIT_MESSAGE,
        )
    }

    pub fn author_name(&self) -> &str {
        or_fallback(
            self.head_commit
                .as_ref()
                .and_then(|commit| commit.author.as_ref())
                .and_then(|author| author.name.as_deref()),
            UNKNOWN_AUTHOR,
        )
    }
}
