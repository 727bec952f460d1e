use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
	Beginner,
	Intermediate,
	Advanced,
	/// Items that declare no level, or one we do not recognize.
	AllLevels,
}
impl Level {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Beginner => "Beginner",
			Self::Intermediate => "Intermediate",
			Self::Advanced => "Advanced",
			Self::AllLevels => "All Levels",
		}
	}

	pub fn parse_lenient(raw: &str) -> Self {
		raw.parse().unwrap_or(Self::AllLevels)
	}
}

impl FromStr for Level {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_lowercase().as_str() {
			"beginner" => Ok(Self::Beginner),
			"intermediate" => Ok(Self::Intermediate),
			"advanced" => Ok(Self::Advanced),
			"" | "all" | "all levels" | "any" => Ok(Self::AllLevels),
			other => Err(format!("Unknown level {other:?}.")),
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for Level {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Level {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = Option::<String>::deserialize(deserializer)?;

		Ok(raw.as_deref().map(Level::parse_lenient).unwrap_or(Level::AllLevels))
	}
}

impl Default for Level {
	fn default() -> Self {
		Self::AllLevels
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
	#[serde(alias = "course_id", deserialize_with = "deserialize_id")]
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub level: Level,
	#[serde(default)]
	pub duration_hours: f32,
	#[serde(default, deserialize_with = "deserialize_skills")]
	pub skills: Vec<String>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub instructor: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}
impl CatalogItem {
	pub fn skills_text(&self) -> String {
		self.skills.join(", ")
	}

	/// Lowercased concatenation embedded into the vector index. Only the index build calls this.
	pub fn combined_text(&self) -> String {
		[
			self.title.as_str(),
			self.skills_text().as_str(),
			self.description.as_str(),
			self.category.as_str(),
			self.level.as_str(),
			self.instructor.as_str(),
		]
		.iter()
		.map(|part| part.trim())
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
		.to_lowercase()
	}

	pub fn url_or(&self, base_url: &str) -> String {
		match self.url.as_deref().map(str::trim) {
			Some(url) if !url.is_empty() => url.to_string(),
			_ => format!("{}/{}", base_url.trim_end_matches('/'), self.id),
		}
	}
}

/// Splits a delimited skills string (`,`, `|` or `;`) into deduplicated tags.
pub fn parse_skills(raw: &str) -> Vec<String> {
	dedup_skills(raw.split([',', '|', ';']).map(str::to_string))
}

/// First `max_graphemes` grapheme clusters of `text`, safe for Arabic and combining marks.
pub fn snippet(text: &str, max_graphemes: usize) -> String {
	text.trim().graphemes(true).take(max_graphemes).collect()
}

fn dedup_skills<I>(skills: I) -> Vec<String>
where
	I: IntoIterator<Item = String>,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for skill in skills {
		let trimmed = skill.trim();

		if trimmed.is_empty() {
			continue;
		}
		if seen.insert(trimmed.to_lowercase()) {
			out.push(trimmed.to_string());
		}
	}

	out
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Integer(i64),
	}

	match RawId::deserialize(deserializer)? {
		RawId::Text(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
		RawId::Text(_) => Err(de::Error::custom("Catalog item id must be non-empty.")),
		RawId::Integer(value) => Ok(value.to_string()),
	}
}

fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawSkills {
		Delimited(String),
		List(Vec<String>),
	}

	Ok(match Option::<RawSkills>::deserialize(deserializer)? {
		Some(RawSkills::Delimited(raw)) => parse_skills(&raw),
		Some(RawSkills::List(list)) => dedup_skills(list),
		None => Vec::new(),
	})
}
