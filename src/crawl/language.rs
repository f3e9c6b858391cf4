//! Language identification of related concept names.

use whatlang::{Detector, Lang, Script};

use crate::error::{Result, UmlsGraphError};

/// Below this many letters trigram statistics are noise; names that short
/// are judged by script alone.
const MIN_DETECTABLE_LETTERS: usize = 32;

/// Languages the terminology service publishes concept names in.
const SOURCE_LANGUAGES: &[Lang] = &[
    Lang::Eng,
    Lang::Spa,
    Lang::Fra,
    Lang::Deu,
    Lang::Ita,
    Lang::Por,
    Lang::Nld,
    Lang::Swe,
    Lang::Dan,
    Lang::Nob,
    Lang::Fin,
    Lang::Ces,
    Lang::Hun,
    Lang::Pol,
    Lang::Tur,
    Lang::Rus,
    Lang::Ukr,
    Lang::Heb,
    Lang::Kor,
    Lang::Jpn,
    Lang::Cmn,
];

/// Decides whether a related concept name is in the target language.
///
/// Any `Err` means the text could not be classified; callers drop the record.
pub trait LanguageFilter {
    fn is_target(&self, text: &str) -> Result<bool>;
}

/// Language filter backed by `whatlang`.
///
/// Text in a script the target language is not written in is rejected.
/// Short text in the target's script is accepted, since concept names like
/// "Chest pain" are too short for trigram detection. Longer text is run
/// through a detector restricted to [`SOURCE_LANGUAGES`] and rejected only
/// when the detector reliably picks another language.
pub struct WhatlangFilter {
    target: Lang,
    script: Option<Script>,
    detector: Detector,
}

impl WhatlangFilter {
    pub fn new(target: Lang) -> Self {
        let mut allowlist = SOURCE_LANGUAGES.to_vec();
        if !allowlist.contains(&target) {
            allowlist.push(target);
        }
        Self {
            target,
            script: native_script(target),
            detector: Detector::with_allowlist(allowlist),
        }
    }

    /// Build from an ISO 639-3 code such as `eng`.
    pub fn from_code(code: &str) -> Result<Self> {
        Lang::from_code(code)
            .map(Self::new)
            .ok_or_else(|| UmlsGraphError::InvalidInput(format!("Unknown language code: {}", code)))
    }

    pub fn target(&self) -> Lang {
        self.target
    }
}

impl Default for WhatlangFilter {
    fn default() -> Self {
        Self::new(Lang::Eng)
    }
}

/// Script a language is written in, when it has exactly one.
fn native_script(lang: Lang) -> Option<Script> {
    match lang {
        Lang::Rus | Lang::Ukr | Lang::Bel | Lang::Bul | Lang::Srp | Lang::Mkd => Some(Script::Cyrillic),
        Lang::Heb => Some(Script::Hebrew),
        Lang::Kor => Some(Script::Hangul),
        // Japanese mixes kana with Han characters
        Lang::Jpn | Lang::Cmn => None,
        _ => Some(Script::Latin),
    }
}

impl LanguageFilter for WhatlangFilter {
    fn is_target(&self, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UmlsGraphError::LanguageCheckFailed("empty text".to_string()));
        }

        let script = whatlang::detect_script(text).ok_or_else(|| {
            UmlsGraphError::LanguageCheckFailed(format!("no script detected in {:?}", text))
        })?;
        if let Some(expected) = self.script {
            if script != expected {
                return Ok(false);
            }
        }

        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        if letters < MIN_DETECTABLE_LETTERS {
            return Ok(true);
        }

        match self.detector.detect(text) {
            Some(info) => Ok(info.lang() == self.target || !info.is_reliable()),
            None => Err(UmlsGraphError::LanguageCheckFailed(format!(
                "no language features in {:?}",
                text
            ))),
        }
    }
}
