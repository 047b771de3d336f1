use muse_history::{Audience, ContentType, GenerationParams, Language, RhymeScheme, Tone};

pub struct ContentPrompt;

impl ContentPrompt {
    /// Assembles the instruction sent to the model. Same parameters, same bytes.
    pub fn get_prompt(params: &GenerationParams) -> String {
        let mut sentences = vec![format!(
            "{} about '{}'.",
            Self::content_instruction(params.content_type),
            params.keyword.trim()
        )];

        if !params.content_type.has_fixed_form() {
            sentences.push(format!("Aim for about {} words.", params.length_words));
        }

        sentences.push(Self::language_instruction(params.language).to_string());

        if let Some(tone) = params.tone {
            sentences.push(Self::tone_instruction(tone).to_string());
        }

        if let Some(audience) = params.audience {
            sentences.push(Self::audience_instruction(audience).to_string());
        }

        // Rhyme only means something for verse.
        if let Some(rhyme_scheme) = params.rhyme_scheme {
            if params.content_type.is_verse() {
                sentences.push(Self::rhyme_instruction(rhyme_scheme).to_string());
            }
        }

        sentences.push(
            "Respond with the content only, without titles, explanations or meta-commentary."
                .to_string(),
        );

        sentences.join(" ")
    }

    fn content_instruction(content_type: ContentType) -> &'static str {
        match content_type {
            ContentType::Quote => "Write a memorable, inspiring quote",
            ContentType::Poem => "Create a poem (3-8 lines preferred)",
            ContentType::Haiku => "Write a traditional 3-line haiku (5-7-5 syllable pattern)",
            ContentType::Motivational => "Create an uplifting motivational saying",
            ContentType::Caption => {
                "Write a catchy social media caption (under 280 characters)"
            }
            ContentType::Lyrics => "Write song lyrics with rhythm and flow",
            ContentType::Story => "Write an engaging story opening paragraph",
        }
    }

    fn language_instruction(language: Language) -> &'static str {
        match language {
            Language::English => "Write in English.",
            Language::Hindi => "Write in Hindi.",
            Language::Marathi => "Write in Marathi.",
            Language::Spanish => "Write in Spanish.",
            Language::French => "Write in French.",
            Language::German => "Write in German.",
        }
    }

    fn tone_instruction(tone: Tone) -> &'static str {
        match tone {
            Tone::Inspirational => "Make it uplifting and motivating.",
            Tone::Funny => "Make it humorous and witty.",
            Tone::Serious => "Keep it thoughtful and profound.",
            Tone::Romantic => "Make it romantic and heartfelt.",
            Tone::Professional => "Keep it professional and polished.",
        }
    }

    fn audience_instruction(audience: Audience) -> &'static str {
        match audience {
            Audience::General => "Use clear language suitable for a general audience.",
            Audience::Kids => "Use simple, fun language suitable for children.",
            Audience::Adults => "Use mature, sophisticated language.",
            Audience::Professionals => "Use formal, business-appropriate language.",
        }
    }

    fn rhyme_instruction(rhyme_scheme: RhymeScheme) -> &'static str {
        match rhyme_scheme {
            RhymeScheme::FreeVerse => "Use free verse (no specific rhyme scheme).",
            RhymeScheme::Abab => "Use an ABAB rhyme scheme.",
            RhymeScheme::Aabb => "Use an AABB rhyme scheme (couplets).",
            RhymeScheme::Abcb => "Use an ABCB rhyme scheme.",
        }
    }
}
