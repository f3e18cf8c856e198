//! Context parser.
//!
//! Two surfaces:
//! - [`ContextParser::parse_initial`] reads the user's opening description and
//!   seeds the primary symptom plus any duration or severity cue it finds.
//! - [`ContextParser::parse_answer`] turns a quick-option label or a short
//!   free-text reply into the typed value for the question just asked.
//!
//! Both only report what the text actually says. When no cue is present the
//! field is left unset rather than defaulted.

use once_cell::sync::Lazy;
use regex::Regex;

use super::context::{ContextUpdate, Frequency, Severity, SymptomDuration};
use super::question::QuestionType;

/// "7/10", "7 / 10", "7 out of 10".
static SCORE_OUT_OF_TEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(10|[1-9])\s*(?:/|out of)\s*10\b").expect("score pattern is valid")
});

/// A reply that is just a number, e.g. "6" or "about 6".
static BARE_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:about |around |maybe |a )?(10|[1-9])\.?$").expect("bare score pattern is valid")
});

/// "3 days", "2 weeks", "6 hours". Only counts as a duration with a timing
/// word around it; see [`counted_span`].
static COUNTED_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3})\s*(hour|day|week|month|year)s?\b").expect("span pattern is valid")
});

/// Words that make a following count a duration: "for 3 days", "past 2 weeks".
const SPAN_LEADS: &[&str] = &[
    "for", "since", "past", "last", "over", "about", "around", "nearly", "almost", "than",
];

const SELF_REFERENCE_PREFIXES: &[&str] = &[
    "i've been having ",
    "i have been having ",
    "i've been experiencing ",
    "i have been experiencing ",
    "i'm experiencing ",
    "i am experiencing ",
    "i'm suffering from ",
    "i am suffering from ",
    "i'm having ",
    "i am having ",
    "i'm feeling ",
    "i am feeling ",
    "i think i have ",
    "i've had ",
    "i have had ",
    "i've got ",
    "i have got ",
    "i got ",
    "i have ",
    "i feel ",
    "there's ",
    "there is ",
    "my ",
];

const LEADING_FILLERS: &[&str] = &["a ", "an ", "some ", "the ", "really ", "kind of "];

/// Where the symptom phrase ends and timing information begins.
const PHRASE_TERMINATORS: &[&str] = &[
    " since ",
    " for ",
    " starting ",
    " that started",
    " which started",
    " started ",
    " today",
    " this morning",
    " yesterday",
    " last night",
    " and it's ",
    " and its ",
    ",",
    ".",
    "!",
    "?",
];

const DURATION_CUES: &[(&str, SymptomDuration)] = &[
    ("for months", SymptomDuration::Months),
    ("for a month", SymptomDuration::Months),
    ("few months", SymptomDuration::Months),
    ("several months", SymptomDuration::Months),
    ("for years", SymptomDuration::Months),
    ("for a year", SymptomDuration::Months),
    ("since last month", SymptomDuration::Weeks),
    ("for weeks", SymptomDuration::Weeks),
    ("few weeks", SymptomDuration::Weeks),
    ("couple of weeks", SymptomDuration::Weeks),
    ("couple weeks", SymptomDuration::Weeks),
    ("several weeks", SymptomDuration::Weeks),
    ("two weeks", SymptomDuration::Weeks),
    ("for a week", SymptomDuration::AboutAWeek),
    ("about a week", SymptomDuration::AboutAWeek),
    ("since last week", SymptomDuration::AboutAWeek),
    ("since yesterday", SymptomDuration::FewDays),
    ("yesterday", SymptomDuration::FewDays),
    ("few days", SymptomDuration::FewDays),
    ("couple of days", SymptomDuration::FewDays),
    ("couple days", SymptomDuration::FewDays),
    ("two days", SymptomDuration::FewDays),
    ("for days", SymptomDuration::FewDays),
    ("last night", SymptomDuration::Today),
    ("this morning", SymptomDuration::Today),
    ("just started", SymptomDuration::Today),
    ("few hours", SymptomDuration::Today),
    ("an hour ago", SymptomDuration::Today),
    ("today", SymptomDuration::Today),
];

const SEVERITY_CUES: &[(&str, u8)] = &[
    ("unbearable", 9),
    ("excruciating", 9),
    ("agonizing", 9),
    ("worst pain", 9),
    ("severe", 8),
    ("terrible", 8),
    ("really bad", 8),
    ("very bad", 8),
    ("intense", 8),
    ("moderate", 5),
    ("pretty bad", 5),
    ("quite bad", 5),
    ("mild", 2),
    ("slight", 2),
    ("a little", 2),
    ("minor", 2),
    ("not too bad", 2),
];

const FREQUENCY_CUES: &[(&str, Frequency)] = &[
    ("comes and goes", Frequency::ComesAndGoes),
    ("on and off", Frequency::ComesAndGoes),
    ("off and on", Frequency::ComesAndGoes),
    ("intermittent", Frequency::ComesAndGoes),
    ("first time", Frequency::FirstTime),
    ("never had", Frequency::FirstTime),
    ("never before", Frequency::FirstTime),
    ("constant", Frequency::Constant),
    ("all the time", Frequency::Constant),
    ("nonstop", Frequency::Constant),
    ("non-stop", Frequency::Constant),
    ("always", Frequency::Constant),
    ("occasionally", Frequency::Occasional),
    ("sometimes", Frequency::Occasional),
    ("once in a while", Frequency::Occasional),
    ("now and then", Frequency::Occasional),
];

const NONE_ANSWERS: &[&str] = &[
    "none",
    "none of these",
    "nothing like that",
    "nothing",
    "no",
    "nope",
    "not really",
    "no other symptoms",
    "nothing else",
    "n/a",
];

const UNSURE_ANSWERS: &[&str] = &[
    "not sure",
    "i'm not sure",
    "unsure",
    "don't know",
    "i don't know",
    "no idea",
    "dunno",
];

const LIST_SEPARATORS: &[&str] = &[",", ";", " and ", " & ", " plus ", " also "];

/// Stateless parser from normalized user text to [`ContextUpdate`]s.
#[derive(Debug, Clone, Default)]
pub struct ContextParser;

impl ContextParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses the opening free-text description.
    pub fn parse_initial(&self, normalized_text: &str) -> ContextUpdate {
        ContextUpdate {
            primary_symptom: extract_symptom_phrase(normalized_text),
            duration: duration_cue(normalized_text),
            severity: severity_cue(normalized_text),
            ..Default::default()
        }
    }

    /// Parses a reply to `last_question`, touching only that question's field.
    pub fn parse_answer(&self, normalized_text: &str, last_question: QuestionType) -> ContextUpdate {
        let text = trim_punctuation(normalized_text);
        if text.is_empty() {
            return ContextUpdate::default();
        }

        match last_question {
            QuestionType::Duration => ContextUpdate {
                duration: option_index(last_question, text)
                    .map(duration_for_option)
                    .or_else(|| timed_duration(text, SpanContext::Implied))
                    .or_else(|| duration_word(text)),
                ..Default::default()
            },
            QuestionType::Severity => ContextUpdate {
                severity: option_index(last_question, text)
                    .and_then(severity_for_option)
                    .or_else(|| bare_score(text))
                    .or_else(|| severity_cue(text)),
                ..Default::default()
            },
            QuestionType::Frequency => ContextUpdate {
                frequency: option_index(last_question, text)
                    .map(frequency_for_option)
                    .or_else(|| frequency_cue(text)),
                ..Default::default()
            },
            QuestionType::AssociatedSymptoms => {
                let (items, answered_none) = list_answer(last_question, text);
                ContextUpdate {
                    associated_symptoms: items,
                    answered_none,
                    ..Default::default()
                }
            }
            QuestionType::RecentEvents => {
                let (items, answered_none) = list_answer(last_question, text);
                ContextUpdate {
                    recent_events: items,
                    answered_none,
                    ..Default::default()
                }
            }
            QuestionType::ChronicConditions => {
                let (items, answered_none) = list_answer(last_question, text);
                ContextUpdate {
                    chronic_conditions: items,
                    answered_none,
                    ..Default::default()
                }
            }
        }
    }
}

fn extract_symptom_phrase(text: &str) -> Option<String> {
    let mut phrase = trim_punctuation(text);

    if let Some(prefix) = SELF_REFERENCE_PREFIXES
        .iter()
        .find(|prefix| phrase.starts_with(*prefix))
    {
        phrase = &phrase[prefix.len()..];
    }
    while let Some(filler) = LEADING_FILLERS.iter().find(|f| phrase.starts_with(*f)) {
        phrase = &phrase[filler.len()..];
    }

    let end = PHRASE_TERMINATORS
        .iter()
        .filter_map(|terminator| phrase.find(terminator))
        .min()
        .unwrap_or(phrase.len());
    let phrase = trim_punctuation(&phrase[..end]);

    if phrase.is_empty() {
        None
    } else {
        Some(capitalize(phrase))
    }
}

fn duration_cue(text: &str) -> Option<SymptomDuration> {
    timed_duration(text, SpanContext::Required)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanContext {
    /// Free text: a bare count may be an age or a dose.
    Required,
    /// Reply to the duration question: the question supplies the context.
    Implied,
}

fn timed_duration(text: &str, context: SpanContext) -> Option<SymptomDuration> {
    if let Some(duration) = counted_span(text, context) {
        return Some(duration);
    }
    DURATION_CUES
        .iter()
        .find(|(cue, _)| text.contains(cue))
        .map(|(_, duration)| *duration)
}

/// First counted span that reads as a duration. "35 years old" and
/// "my 4 year old" never do.
fn counted_span(text: &str, context: SpanContext) -> Option<SymptomDuration> {
    COUNTED_SPAN.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let after = text[whole.end()..].trim_start_matches(|c: char| c == ' ' || c == '-');
        if after.starts_with("old") {
            return None;
        }
        let lead = text[..whole.start()].split_whitespace().last();
        let cued = after.starts_with("ago") || lead.map_or(false, |word| SPAN_LEADS.contains(&word));
        if context == SpanContext::Required && !cued {
            return None;
        }

        let count: u32 = caps[1].parse().ok()?;
        let duration = match &caps[2] {
            "hour" => SymptomDuration::Today,
            "day" if count <= 3 => SymptomDuration::FewDays,
            "day" if count <= 10 => SymptomDuration::AboutAWeek,
            "day" => SymptomDuration::Weeks,
            "week" if count <= 1 => SymptomDuration::AboutAWeek,
            "week" if count < 8 => SymptomDuration::Weeks,
            _ => SymptomDuration::Months,
        };
        Some(duration)
    })
}

/// Single-word replies to the duration question.
fn duration_word(text: &str) -> Option<SymptomDuration> {
    let duration = match text {
        "today" | "hours" | "just now" | "recently" => SymptomDuration::Today,
        "a day" | "a day or two" | "days" | "1 day" => SymptomDuration::FewDays,
        "a week" | "week" => SymptomDuration::AboutAWeek,
        "weeks" => SymptomDuration::Weeks,
        "months" | "a month" | "years" | "a year" | "ages" => SymptomDuration::Months,
        _ => return None,
    };
    Some(duration)
}

fn severity_cue(text: &str) -> Option<Severity> {
    if let Some(caps) = SCORE_OUT_OF_TEN.captures(text) {
        return caps[1].parse().ok().and_then(|n| Severity::new(n).ok());
    }
    SEVERITY_CUES
        .iter()
        .find(|(cue, _)| text.contains(cue))
        .and_then(|(_, score)| Severity::new(*score).ok())
}

fn bare_score(text: &str) -> Option<Severity> {
    let caps = BARE_SCORE.captures(text)?;
    caps[1].parse().ok().and_then(|n| Severity::new(n).ok())
}

fn frequency_cue(text: &str) -> Option<Frequency> {
    FREQUENCY_CUES
        .iter()
        .find(|(cue, _)| text.contains(cue))
        .map(|(_, frequency)| *frequency)
}

/// Index of the quick option whose label matches the reply exactly.
fn option_index(question: QuestionType, text: &str) -> Option<usize> {
    question
        .quick_options()
        .iter()
        .position(|label| label.eq_ignore_ascii_case(text))
}

fn duration_for_option(index: usize) -> SymptomDuration {
    match index {
        0 => SymptomDuration::Today,
        1 => SymptomDuration::FewDays,
        2 => SymptomDuration::AboutAWeek,
        3 => SymptomDuration::Weeks,
        _ => SymptomDuration::Months,
    }
}

/// Quick severity bands resolve to their midpoint.
fn severity_for_option(index: usize) -> Option<Severity> {
    let score = match index {
        0 => 2,
        1 => 5,
        _ => 8,
    };
    Severity::new(score).ok()
}

fn frequency_for_option(index: usize) -> Frequency {
    match index {
        0 => Frequency::Constant,
        1 => Frequency::ComesAndGoes,
        2 => Frequency::Occasional,
        _ => Frequency::FirstTime,
    }
}

/// Splits a list reply into items. Returns `(items, answered_none)`.
///
/// Parts that deny something ("none", "no fever") or hedge ("not sure") are
/// dropped. The reply counts as "none" when nothing but denials remain.
fn list_answer(question: QuestionType, text: &str) -> (Vec<String>, bool) {
    let options = question.quick_options();
    if let Some(index) = option_index(question, text) {
        // The last option of every list question means "none".
        if index + 1 == options.len() {
            return (Vec::new(), true);
        }
        return (vec![options[index].to_string()], false);
    }

    let mut parts = vec![text.to_string()];
    for separator in LIST_SEPARATORS {
        parts = parts
            .iter()
            .flat_map(|part| part.split(separator).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }

    let mut items = Vec::new();
    let mut denied = false;
    for part in &parts {
        let mut item = trim_punctuation(part);
        for prefix in SELF_REFERENCE_PREFIXES.iter().chain(LEADING_FILLERS) {
            if let Some(rest) = item.strip_prefix(prefix) {
                item = rest;
            }
        }
        let item = trim_punctuation(item);

        if item.is_empty() || matches!(item, "yes" | "yeah" | "yep") || UNSURE_ANSWERS.contains(&item) {
            continue;
        }
        if is_denial(question, item) {
            denied = true;
            continue;
        }
        items.push(match option_index(question, item) {
            Some(index) => options[index].to_string(),
            None => capitalize(item),
        });
    }

    let answered_none = items.is_empty() && denied;
    (items, answered_none)
}

/// "none", "nothing else", the "none" quick option, or a negated item like
/// "no fever".
fn is_denial(question: QuestionType, item: &str) -> bool {
    NONE_ANSWERS.contains(&item)
        || question
            .quick_options()
            .last()
            .map_or(false, |label| label.eq_ignore_ascii_case(item))
        || ["no ", "not ", "never "]
            .iter()
            .any(|negation| item.starts_with(negation))
}

fn trim_punctuation(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '"'))
        .trim()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
