use crate::loader::LoadError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A single education entry, rendered in source order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    /// Degree or qualification name
    pub degree: String,
    /// School, college or university
    pub institute: String,
    /// Free-form year or year range (e.g. "2019 - 2023")
    pub year: String,
    /// Optional grade badge shown under the institute
    #[serde(default, deserialize_with = "lenient")]
    pub grade: Option<String>,
}

/// Links to external social profiles, passed through verbatim
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Socials {
    #[serde(default, deserialize_with = "lenient")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub facebook: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub instagram: Option<String>,
}

/// Which social network a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialKind {
    Github,
    Linkedin,
    Instagram,
    Facebook,
}

impl SocialKind {
    pub fn label(&self) -> &'static str {
        match self {
            SocialKind::Github => "GitHub",
            SocialKind::Linkedin => "LinkedIn",
            SocialKind::Instagram => "Instagram",
            SocialKind::Facebook => "Facebook",
        }
    }

    /// Stable lowercase identifier, used as a CSS hook in the markup
    pub fn slug(&self) -> &'static str {
        match self {
            SocialKind::Github => "github",
            SocialKind::Linkedin => "linkedin",
            SocialKind::Instagram => "instagram",
            SocialKind::Facebook => "facebook",
        }
    }
}

/// A present social link
#[derive(Debug, Clone, PartialEq)]
pub struct SocialLink<'a> {
    pub kind: SocialKind,
    pub url: &'a str,
}

impl Socials {
    /// Present links in display order: GitHub, LinkedIn, Instagram, Facebook
    pub fn links(&self) -> Vec<SocialLink<'_>> {
        self.collect(&[
            SocialKind::Github,
            SocialKind::Linkedin,
            SocialKind::Instagram,
            SocialKind::Facebook,
        ])
    }

    /// Present links for the footer icon row, which has no Facebook entry
    pub fn footer_links(&self) -> Vec<SocialLink<'_>> {
        self.collect(&[
            SocialKind::Github,
            SocialKind::Linkedin,
            SocialKind::Instagram,
        ])
    }

    fn get(&self, kind: SocialKind) -> Option<&str> {
        let url = match kind {
            SocialKind::Github => &self.github,
            SocialKind::Linkedin => &self.linkedin,
            SocialKind::Instagram => &self.instagram,
            SocialKind::Facebook => &self.facebook,
        };
        // An empty string counts as absent
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    fn collect(&self, order: &[SocialKind]) -> Vec<SocialLink<'_>> {
        order
            .iter()
            .filter_map(|kind| self.get(*kind).map(|url| SocialLink { kind: *kind, url }))
            .collect()
    }
}

/// A categorized group of skill items, distinct from the flat skills list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArsenalGroup {
    /// Group heading (e.g. "Languages")
    pub category: String,
    /// Items listed under the heading, in source order
    #[serde(default)]
    pub items: Vec<String>,
    /// Icon tag; the markup exposes it as a data attribute only
    #[serde(default)]
    pub icon: String,
}

/// One entry of the project gallery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    /// Optional screenshot URL
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    /// Optional source repository URL
    #[serde(default, deserialize_with = "lenient")]
    pub code_url: Option<String>,
    /// Optional deployed site URL
    #[serde(default, deserialize_with = "lenient")]
    pub live_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub tags: Vec<String>,
}

/// The profile document describing the page owner.
///
/// Read-only after load: the page controller never mutates or re-fetches it.
/// Required fields must be present with the right shape; optional sections
/// with an unexpected shape are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Education history, rendered in source order
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub socials: Socials,
    /// Optional categorized skill groups
    #[serde(default, deserialize_with = "lenient")]
    pub arsenal: Option<Vec<ArsenalGroup>>,
    /// Optional project gallery
    #[serde(default, deserialize_with = "lenient")]
    pub projects: Option<Vec<Project>>,
    /// Resume document URL
    pub resume: String,
    /// Profile picture URL
    pub profile_image: String,
}

impl Profile {
    /// Parse a profile document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        serde_json::from_str(content).map_err(LoadError::Parse)
    }

    /// Greeting revealed by the hero typewriter
    pub fn greeting(&self) -> String {
        format!("I'm {}", self.name)
    }

    /// Arsenal groups, empty when the field is absent
    pub fn arsenal_groups(&self) -> &[ArsenalGroup] {
        self.arsenal.as_deref().unwrap_or(&[])
    }

    /// Projects, empty when the field is absent
    pub fn project_list(&self) -> &[Project] {
        self.projects.as_deref().unwrap_or(&[])
    }

    pub fn social_links(&self) -> Vec<SocialLink<'_>> {
        self.socials.links()
    }
}

/// Deserialize an optional value, falling back to `None` when the value has
/// an unexpected shape instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                warn!(error = %err, "ignoring optional profile field with unexpected shape");
                Ok(None)
            }
        },
    }
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}
