use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;

pub const MIN_LENGTH_WORDS: u16 = 4;
pub const MAX_LENGTH_WORDS: u16 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Quote,
    Poem,
    Haiku,
    Motivational,
    Caption,
    Lyrics,
    Story,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Quote => "quote",
            ContentType::Poem => "poem",
            ContentType::Haiku => "haiku",
            ContentType::Motivational => "motivational",
            ContentType::Caption => "caption",
            ContentType::Lyrics => "lyrics",
            ContentType::Story => "story",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Quote => "Quote",
            ContentType::Poem => "Poem",
            ContentType::Haiku => "Haiku",
            ContentType::Motivational => "Motivational Saying",
            ContentType::Caption => "Social Media Caption",
            ContentType::Lyrics => "Song Lyrics",
            ContentType::Story => "Story Beginning",
        }
    }

    pub fn default_length_words(&self) -> u16 {
        match self {
            ContentType::Quote => 12,
            ContentType::Haiku => 17,
            ContentType::Caption => 25,
            ContentType::Poem
            | ContentType::Motivational
            | ContentType::Lyrics
            | ContentType::Story => 50,
        }
    }

    /// Haiku length is dictated by its syllable pattern, not a word target.
    pub fn has_fixed_form(&self) -> bool {
        matches!(self, ContentType::Haiku)
    }

    pub fn is_verse(&self) -> bool {
        matches!(self, ContentType::Poem | ContentType::Lyrics)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Marathi,
    Spanish,
    French,
    German,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Marathi => "Marathi",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Inspirational,
    Funny,
    Serious,
    Romantic,
    Professional,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Inspirational => "Inspirational",
            Tone::Funny => "Funny",
            Tone::Serious => "Serious",
            Tone::Romantic => "Romantic",
            Tone::Professional => "Professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    General,
    Kids,
    Adults,
    Professionals,
}

impl Audience {
    pub fn label(&self) -> &'static str {
        match self {
            Audience::General => "General",
            Audience::Kids => "Kids",
            Audience::Adults => "Adults",
            Audience::Professionals => "Professionals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RhymeScheme {
    FreeVerse,
    Abab,
    Aabb,
    Abcb,
}

impl RhymeScheme {
    pub fn label(&self) -> &'static str {
        match self {
            RhymeScheme::FreeVerse => "Free Verse",
            RhymeScheme::Abab => "ABAB",
            RhymeScheme::Aabb => "AABB",
            RhymeScheme::Abcb => "ABCB",
        }
    }
}

/// Everything the prompt is built from. Shared by generation and the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub keyword: String,
    pub content_type: ContentType,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhyme_scheme: Option<RhymeScheme>,
    pub length_words: u16,
}

impl GenerationParams {
    pub fn new(keyword: impl Into<String>, content_type: ContentType, language: Language) -> Self {
        Self {
            keyword: keyword.into(),
            content_type,
            language,
            tone: None,
            audience: None,
            rhyme_scheme: None,
            length_words: content_type.default_length_words(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn with_rhyme_scheme(mut self, rhyme_scheme: RhymeScheme) -> Self {
        self.rhyme_scheme = Some(rhyme_scheme);
        self
    }

    pub fn with_length_words(mut self, length_words: u16) -> Self {
        self.length_words = length_words;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.keyword.trim().is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }
        if !(MIN_LENGTH_WORDS..=MAX_LENGTH_WORDS).contains(&self.length_words) {
            return Err(ValidationError::LengthOutOfRange(self.length_words));
        }
        Ok(())
    }
}

/// A validated generation result that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub(crate) params: GenerationParams,
    pub(crate) text: String,
    pub(crate) tags: BTreeSet<String>,
}

impl NewRecord {
    pub fn new<I, S>(params: GenerationParams, text: &str, tags: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        params.validate()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let params = GenerationParams {
            keyword: params.keyword.trim().to_string(),
            ..params
        };
        let tags = tags
            .into_iter()
            .filter_map(|tag| normalize_tag(tag.as_ref()).ok())
            .collect();

        Ok(Self {
            params,
            text: text.to_string(),
            tags,
        })
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub(crate) fn normalize_tag(tag: &str) -> Result<String, ValidationError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(ValidationError::EmptyTag);
    }
    Ok(tag.to_lowercase())
}

/// Splits a comma-separated tag field, dropping blanks.
pub fn parse_tags(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .filter_map(|tag| normalize_tag(tag).ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: Uuid,
    pub keyword: String,
    pub content_type: ContentType,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhyme_scheme: Option<RhymeScheme>,
    pub length_words: u16,
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    /// Fields written by other versions, carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationRecord {
    pub(crate) fn from_new(record: NewRecord, id: Uuid, created_at: DateTime<Utc>) -> Self {
        let NewRecord { params, text, tags } = record;
        Self {
            id,
            keyword: params.keyword,
            content_type: params.content_type,
            language: params.language,
            tone: params.tone,
            audience: params.audience,
            rhyme_scheme: params.rhyme_scheme,
            length_words: params.length_words,
            text,
            tags,
            favorite: false,
            created_at,
            extra: Map::new(),
        }
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            keyword: self.keyword.clone(),
            content_type: self.content_type,
            language: self.language,
            tone: self.tone,
            audience: self.audience,
            rhyme_scheme: self.rhyme_scheme,
            length_words: self.length_words,
        }
    }

    /// Invariants every stored record holds: the parameters validate and the text is non-empty.
    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        self.params().validate()?;
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(())
    }

    pub fn download_file_name(&self) -> String {
        let keyword: String = self
            .keyword
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}.txt", keyword, self.content_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> GenerationParams {
        GenerationParams::new("  Success ", ContentType::Quote, Language::English)
    }

    #[test]
    fn default_length_follows_content_type() {
        assert_eq!(params().length_words, 12);
        let haiku = GenerationParams::new("moon", ContentType::Haiku, Language::English);
        assert_eq!(haiku.length_words, 17);
        let story = GenerationParams::new("moon", ContentType::Story, Language::English);
        assert_eq!(story.length_words, 50);
    }

    #[test]
    fn rejects_blank_keyword_and_out_of_range_length() {
        let blank = GenerationParams::new("   ", ContentType::Quote, Language::English);
        assert_eq!(blank.validate(), Err(ValidationError::EmptyKeyword));

        assert_eq!(
            params().with_length_words(3).validate(),
            Err(ValidationError::LengthOutOfRange(3))
        );
        assert_eq!(
            params().with_length_words(151).validate(),
            Err(ValidationError::LengthOutOfRange(151))
        );
        assert!(params().with_length_words(4).validate().is_ok());
        assert!(params().with_length_words(150).validate().is_ok());
    }

    #[test]
    fn new_record_trims_and_normalizes() {
        let record = NewRecord::new(params(), "  Keep going.\n", [" work ", "", "life"]).unwrap();

        assert_eq!(record.params().keyword, "Success");
        assert_eq!(record.text(), "Keep going.");
        assert_eq!(
            record.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["life", "work"]
        );
    }

    #[test]
    fn new_record_requires_text() {
        let err = NewRecord::new(params(), "  ", Vec::<String>::new()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);
    }

    #[test]
    fn parses_comma_separated_tags() {
        let tags = parse_tags("personal, motivation,,work , personal");
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec!["motivation", "personal", "work"]
        );
    }

    #[test]
    fn tags_are_case_insensitive() {
        let tags = parse_tags("Motivation, work,WORK , Life");
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec!["life", "motivation", "work"]
        );
        assert_eq!(normalize_tag("  Summer ").unwrap(), "summer");
        assert_eq!(normalize_tag(" "), Err(ValidationError::EmptyTag));
    }

    #[test]
    fn record_uses_camel_case_and_keeps_unknown_fields() {
        let raw = json!({
            "id": "6f1c2c1e-1f7a-4c53-9a43-6c1d0f2b9a10",
            "keyword": "Love",
            "contentType": "poem",
            "language": "french",
            "rhymeScheme": "abab",
            "lengthWords": 40,
            "text": "Roses",
            "createdAt": "2025-01-02T03:04:05Z",
            "mood": "sunny"
        });

        let record: GenerationRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.content_type, ContentType::Poem);
        assert_eq!(record.rhyme_scheme, Some(RhymeScheme::Abab));
        assert!(record.tags.is_empty());
        assert!(!record.favorite);

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["mood"], "sunny");
        assert_eq!(encoded["lengthWords"], 40);
        assert!(encoded.get("tone").is_none());
    }

    #[test]
    fn download_name_is_path_safe() {
        let new = NewRecord::new(
            GenerationParams::new("Hope / Dreams", ContentType::Lyrics, Language::English),
            "La la",
            Vec::<String>::new(),
        )
        .unwrap();
        let record = GenerationRecord::from_new(new, Uuid::new_v4(), Utc::now());

        assert_eq!(record.download_file_name(), "Hope___Dreams_lyrics.txt");
    }
}
