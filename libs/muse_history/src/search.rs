use serde::{Deserialize, Serialize};

use crate::model::{ContentType, GenerationRecord, Language};

/// Free-text needle plus optional filters. An empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    #[serde(alias = "q")]
    pub text: String,
    pub content_type: Option<ContentType>,
    pub language: Option<Language>,
    pub favorite: Option<bool>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn matches(&self, record: &GenerationRecord) -> bool {
        if self
            .content_type
            .is_some_and(|content_type| record.content_type != content_type)
        {
            return false;
        }
        if self
            .language
            .is_some_and(|language| record.language != language)
        {
            return false;
        }
        if self
            .favorite
            .is_some_and(|favorite| record.favorite != favorite)
        {
            return false;
        }

        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        record.keyword.to_lowercase().contains(&needle)
            || record.text.to_lowercase().contains(&needle)
            || record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}
