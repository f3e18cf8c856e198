//! Template Guidance Synthesizer
//!
//! Rule-based prose: picks causes and self-care steps from a small table of
//! symptom words and frames them by urgency. Needs no network and always
//! answers, so it doubles as the fallback synthesizer.

use async_trait::async_trait;

use crate::domain::triage::{Relationship, UrgencyLevel};
use crate::ports::{Guidance, GuidanceError, GuidanceRequest, GuidanceSynthesizer};

struct Topic {
    cues: &'static [&'static str],
    causes: &'static [&'static str],
    actions: &'static [&'static str],
}

const TOPICS: &[Topic] = &[
    Topic {
        cues: &["headache", "migraine"],
        causes: &["Tension or stress", "Dehydration", "Eye strain or poor sleep"],
        actions: &[
            "Drink some water and rest somewhere quiet and dark",
            "An over-the-counter pain reliever may help if it's safe for you",
        ],
    },
    Topic {
        cues: &["cough", "cold", "throat", "congestion", "runny nose", "sinus"],
        causes: &["A viral upper respiratory infection", "Seasonal allergies"],
        actions: &["Rest and stay hydrated", "Warm drinks or honey can soothe a sore throat"],
    },
    Topic {
        cues: &["fever", "chills"],
        causes: &["Your body fighting an infection"],
        actions: &["Drink plenty of fluids", "Check your temperature every few hours"],
    },
    Topic {
        cues: &["stomach", "nausea", "vomit", "diarrhea", "abdominal"],
        causes: &["A stomach bug", "Something you ate"],
        actions: &["Sip clear fluids often", "Eat bland food once you feel able"],
    },
    Topic {
        cues: &["back", "joint", "knee", "shoulder", "muscle", "sprain"],
        causes: &["Muscle strain", "Overuse or a minor injury"],
        actions: &["Rest it, then keep gently moving", "Try ice for the first two days, then heat"],
    },
    Topic {
        cues: &["rash", "itch", "hives", "skin"],
        causes: &["Skin irritation", "A mild allergic reaction"],
        actions: &["Avoid scratching", "Use a gentle, fragrance-free moisturizer"],
    },
    Topic {
        cues: &["anxi", "stress", "panic", "sleep", "depress", "mood"],
        causes: &["Stress or anxiety", "Disrupted sleep"],
        actions: &["Try a few minutes of slow breathing", "Talk to someone you trust"],
    },
];

#[derive(Debug, Clone, Default)]
pub struct TemplateGuidanceSynthesizer;

impl TemplateGuidanceSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn compose(&self, request: &GuidanceRequest) -> Guidance {
        let symptom_text = request.context.symptom_text();
        let mut possible_causes: Vec<String> = Vec::new();
        let mut immediate_actions: Vec<String> = Vec::new();

        if let Some(action) = urgency_action(request.urgency) {
            immediate_actions.push(action.to_string());
        }
        for topic in TOPICS
            .iter()
            .filter(|topic| topic.cues.iter().any(|cue| symptom_text.contains(cue)))
        {
            push_unique(&mut possible_causes, topic.causes);
            push_unique(&mut immediate_actions, topic.actions);
        }
        if possible_causes.is_empty() {
            possible_causes.push("Several common, usually minor conditions can cause this".to_string());
        }

        let mut when_to_seek_help = vec![
            request.urgency.summary().to_string(),
            "Get care sooner if things get worse or new symptoms appear".to_string(),
        ];
        if !request.red_flags.is_empty() {
            when_to_seek_help.push(format!(
                "You mentioned {}, which should be checked promptly",
                request.red_flags.join(", ")
            ));
        }
        if is_child(request) {
            when_to_seek_help
                .push("Children can get worse quickly, so call their pediatrician if you're unsure".to_string());
        }

        Guidance {
            possible_causes,
            immediate_actions,
            when_to_seek_help,
        }
    }
}

fn urgency_action(urgency: UrgencyLevel) -> Option<&'static str> {
    match urgency {
        UrgencyLevel::Emergency => Some("Call 911 now"),
        UrgencyLevel::Urgent => Some("Arrange to be seen today"),
        UrgencyLevel::Soon => Some("Book an appointment for the next day or two"),
        _ => None,
    }
}

fn is_child(request: &GuidanceRequest) -> bool {
    request.relationship == Some(Relationship::Child) || request.age.is_some_and(|age| age < 18)
}

fn push_unique(target: &mut Vec<String>, items: &[&str]) {
    for item in items {
        if !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }
}

#[async_trait]
impl GuidanceSynthesizer for TemplateGuidanceSynthesizer {
    async fn synthesize(&self, request: &GuidanceRequest) -> Result<Guidance, GuidanceError> {
        Ok(self.compose(request))
    }
}
