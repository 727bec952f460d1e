use serde::{Deserialize, Serialize};

use crs_domain::{CatalogItem, Level};

/// Value that disables a text filter, as sent by form-style front ends.
const ANY: &str = "any";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendFilters {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_duration_hours: Option<f32>,
}
impl RecommendFilters {
	pub fn is_empty(&self) -> bool {
		active(self.category.as_deref()).is_none()
			&& active(self.level.as_deref()).is_none()
			&& self.max_duration_hours.is_none()
	}

	pub fn matches(&self, item: &CatalogItem) -> bool {
		if let Some(category) = active(self.category.as_deref())
			&& !item.category.trim().eq_ignore_ascii_case(category)
		{
			return false;
		}
		if let Some(level) = active(self.level.as_deref())
			&& !level.parse::<Level>().is_ok_and(|level| level == item.level)
		{
			return false;
		}
		if let Some(max) = self.max_duration_hours
			&& item.duration_hours > max
		{
			return false;
		}

		true
	}
}

fn active(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ANY))
}
