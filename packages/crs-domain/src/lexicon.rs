//! Fixed word lists shared by query normalization and relevance gating.

/// Removed from normalized queries after abbreviation expansion.
pub const QUERY_STOPWORDS: &[&str] = &[
	"a", "about", "an", "and", "any", "are", "at", "be", "can", "class", "course", "courses", "do",
	"find", "for", "give", "how", "i", "im", "in", "is", "learn", "like", "me", "my", "need", "of",
	"on", "or", "please", "recommend", "show", "some", "teach", "the", "to", "want", "wanna",
	"what", "which", "with", "would",
	// Arabic filler, written in folded form (bare alef).
	"عاوز", "عايز", "اريد", "ابغى", "ابي", "كورس", "كورسات", "دورة", "دوره", "في", "من", "عن",
	"على", "الى", "اتعلم", "ممكن",
];

/// Generic intent words that never count as keyword evidence.
pub const GATE_STOPWORDS: &[&str] = &[
	"advanced", "basic", "basics", "become", "beginner", "beginners", "best", "better", "bootcamp",
	"career", "complete", "course", "courses", "effectively", "fundamentals", "get", "good", "grow",
	"guide", "improve", "intermediate", "intro", "introduction", "learn", "learning", "level",
	"master", "new", "skill", "skills", "start", "started", "top", "tutorial",
];

/// Programming languages, frameworks and tools. A query naming one that the catalog never
/// mentions is answered with zero results.
pub const TECH_TERMS: &[&str] = &[
	".net", "android", "angular", "asp.net", "aws", "azure", "c", "c#", "c++", "css", "dart",
	"django", "docker", "excel", "f#", "figma", "flask", "flutter", "git", "golang", "html", "ios",
	"java", "javascript", "jquery", "kotlin", "kubernetes", "laravel", "linux", "matlab", "mongodb",
	"mysql", "next.js", "node.js", "nodejs", "numpy", "pandas", "perl", "photoshop", "php",
	"postgresql", "powerbi", "python", "pytorch", "r", "react", "ruby", "rust", "scala", "sql",
	"swift", "tableau", "tensorflow", "typescript", "unity", "vue", "vue.js",
];

/// Business and soft-skill terms kept as keywords even when short.
pub const BUSINESS_TERMS: &[&str] = &[
	"accounting", "agile", "branding", "communication", "finance", "hr", "leadership",
	"management", "marketing", "negotiation", "pm", "sales", "scrum", "seo", "strategy",
];

/// Technical terms that carry symbols and must survive punctuation stripping intact.
pub const SYMBOL_TERMS: &[&str] =
	&["c++", "c#", "f#", ".net", "asp.net", "node.js", "vue.js", "next.js"];

/// Abbreviations expanded in every query. Mined entries take precedence.
pub const STATIC_ABBREVIATIONS: &[(&str, &str)] = &[
	("ai", "artificial intelligence"),
	("bi", "business intelligence"),
	("cv", "computer vision"),
	("db", "database"),
	("dl", "deep learning"),
	("hr", "human resources"),
	("js", "javascript"),
	("ml", "machine learning"),
	("nlp", "natural language processing"),
	("oop", "object oriented programming"),
	("pm", "project management"),
	("seo", "search engine optimization"),
	("ui", "user interface"),
	("ux", "user experience"),
];

/// Arabic technical and domain terms with their English equivalents, in folded form.
pub const ARABIC_TERMS: &[(&str, &str)] = &[
	("الذكاء الاصطناعي", "artificial intelligence"),
	("ذكاء اصطناعي", "artificial intelligence"),
	("تعلم الالة", "machine learning"),
	("التعلم الالي", "machine learning"),
	("التعلم العميق", "deep learning"),
	("معالجة اللغات الطبيعية", "natural language processing"),
	("علم البيانات", "data science"),
	("تحليل البيانات", "data analysis"),
	("قواعد البيانات", "database"),
	("قاعدة بيانات", "database"),
	("البيانات", "data"),
	("بيانات", "data"),
	("البرمجة", "programming"),
	("برمجة", "programming"),
	("بايثون", "python"),
	("بيثون", "python"),
	("جافا سكريبت", "javascript"),
	("جافاسكريبت", "javascript"),
	("جافا", "java"),
	("رياكت", "react"),
	("لينكس", "linux"),
	("دوكر", "docker"),
	("اكسل", "excel"),
	("تطوير الويب", "web development"),
	("تطوير المواقع", "web development"),
	("تطبيقات الموبايل", "mobile development"),
	("الامن السيبراني", "cyber security"),
	("امن المعلومات", "information security"),
	("الشبكات", "networking"),
	("شبكات", "networking"),
	("التصميم", "design"),
	("تصميم", "design"),
	("التسويق", "marketing"),
	("تسويق", "marketing"),
	("الادارة", "management"),
	("ادارة", "management"),
	("القيادة", "leadership"),
	("قيادة", "leadership"),
	("المحاسبة", "accounting"),
	("محاسبة", "accounting"),
	("للمبتدئين", "beginner"),
	("مبتدئين", "beginner"),
	("مبتدئ", "beginner"),
	("متقدم", "advanced"),
];

pub fn is_query_stopword(token: &str) -> bool {
	QUERY_STOPWORDS.contains(&token)
}

pub fn is_gate_stopword(token: &str) -> bool {
	GATE_STOPWORDS.contains(&token)
}

pub fn is_tech_term(token: &str) -> bool {
	TECH_TERMS.contains(&token)
}

pub fn is_business_term(token: &str) -> bool {
	BUSINESS_TERMS.contains(&token)
}

pub fn is_symbol_term(token: &str) -> bool {
	SYMBOL_TERMS.contains(&token)
}
