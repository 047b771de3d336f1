use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{ContentType, GenerationRecord, Language};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsOptions {
    pub top_keywords: usize,
    pub recent: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            top_keywords: 10,
            recent: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total: usize,
    pub favorites: usize,
    pub by_content_type: BTreeMap<ContentType, usize>,
    pub by_language: BTreeMap<Language, usize>,
    pub distinct_content_types: usize,
    pub distinct_languages: usize,
    pub top_keywords: Vec<KeywordCount>,
    pub recent: Vec<GenerationRecord>,
}

/// Recomputes the full report from a snapshot; nothing is cached between calls.
pub fn summarize(store: &Store, options: &AnalyticsOptions) -> AnalyticsReport {
    let records = store.records();

    let mut by_content_type = BTreeMap::new();
    let mut by_language = BTreeMap::new();
    for record in records {
        *by_content_type.entry(record.content_type).or_insert(0) += 1;
        *by_language.entry(record.language).or_insert(0) += 1;
    }

    AnalyticsReport {
        total: records.len(),
        favorites: records.iter().filter(|record| record.favorite).count(),
        distinct_content_types: by_content_type.len(),
        distinct_languages: by_language.len(),
        by_content_type,
        by_language,
        top_keywords: top_keywords(records, options.top_keywords),
        recent: records.iter().rev().take(options.recent).cloned().collect(),
    }
}

fn top_keywords(records: &[GenerationRecord], limit: usize) -> Vec<KeywordCount> {
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let keyword = record.keyword.trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        match positions.get(&keyword) {
            Some(&position) => counts[position].count += 1,
            None => {
                positions.insert(keyword.clone(), counts.len());
                counts.push(KeywordCount { keyword, count: 1 });
            }
        }
    }

    // Stable sort: equal counts stay in first-occurrence order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenerationParams, NewRecord};

    fn push(store: &mut Store, keyword: &str, content_type: ContentType, language: Language) {
        let params = GenerationParams::new(keyword, content_type, language);
        store.push(NewRecord::new(params, "text", Vec::<String>::new()).unwrap());
    }

    #[test]
    fn counts_content_types_and_languages() {
        let mut store = Store::default();
        for keyword in ["a", "b", "c"] {
            push(&mut store, keyword, ContentType::Quote, Language::English);
        }
        push(&mut store, "d", ContentType::Poem, Language::Hindi);
        push(&mut store, "e", ContentType::Poem, Language::English);

        let report = summarize(&store, &AnalyticsOptions::default());

        assert_eq!(report.total, 5);
        assert_eq!(
            report.by_content_type,
            BTreeMap::from([(ContentType::Quote, 3), (ContentType::Poem, 2)])
        );
        assert_eq!(
            report.by_language,
            BTreeMap::from([(Language::English, 4), (Language::Hindi, 1)])
        );
        assert_eq!(report.distinct_content_types, 2);
        assert_eq!(report.distinct_languages, 2);
    }

    #[test]
    fn top_keywords_break_ties_by_first_occurrence() {
        let mut store = Store::default();
        for keyword in ["Hope", "love", "Love", "hope", "rain", "LOVE"] {
            push(&mut store, keyword, ContentType::Quote, Language::English);
        }

        let options = AnalyticsOptions {
            top_keywords: 2,
            recent: 0,
        };
        let report = summarize(&store, &options);

        assert_eq!(
            report.top_keywords,
            vec![
                KeywordCount {
                    keyword: "love".into(),
                    count: 3
                },
                KeywordCount {
                    keyword: "hope".into(),
                    count: 2
                },
            ]
        );
        assert!(report.recent.is_empty());

        let mut tied = Store::default();
        for keyword in ["sun", "moon", "moon", "sun"] {
            push(&mut tied, keyword, ContentType::Haiku, Language::English);
        }
        let report = summarize(&tied, &AnalyticsOptions::default());
        assert_eq!(report.top_keywords[0].keyword, "sun");
        assert_eq!(report.top_keywords[1].keyword, "moon");
    }

    #[test]
    fn recent_is_newest_first_and_favorites_counted() {
        let mut store = Store::default();
        for keyword in ["one", "two", "three"] {
            push(&mut store, keyword, ContentType::Story, Language::German);
        }
        let first = store.records()[0].id;
        store.toggle_favorite(first).unwrap();

        let options = AnalyticsOptions {
            top_keywords: 10,
            recent: 2,
        };
        let report = summarize(&store, &options);

        let recent: Vec<&str> = report.recent.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(recent, vec!["three", "two"]);
        assert_eq!(report.favorites, 1);
    }

    #[test]
    fn empty_store_summarizes_to_zero() {
        let report = summarize(&Store::default(), &AnalyticsOptions::default());
        assert_eq!(report.total, 0);
        assert!(report.by_content_type.is_empty());
        assert!(report.top_keywords.is_empty());
        assert!(report.recent.is_empty());
    }

    #[test]
    fn report_serializes_enum_keys_as_names() {
        let mut store = Store::default();
        push(&mut store, "a", ContentType::Quote, Language::Spanish);

        let value = serde_json::to_value(summarize(&store, &AnalyticsOptions::default())).unwrap();

        assert_eq!(value["byContentType"]["quote"], 1);
        assert_eq!(value["byLanguage"]["spanish"], 1);
    }
}
