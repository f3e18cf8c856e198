//! Canned replies for turns after guidance has been given.

use crate::domain::triage::{HealthContext, ServiceRecommendation, UrgencyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Worse,
    Serious,
    Booking,
    Medication,
    Thanks,
}

/// Checked in order; the first topic with a matching cue wins.
const CUES: &[(Topic, &[&str])] = &[
    (Topic::Worse, &["worse", "getting bad", "spreading"]),
    (Topic::Serious, &["serious", "worried", "dangerous", "scared"]),
    (Topic::Booking, &["book", "appointment", "schedule", "see a doctor", "see someone"]),
    (Topic::Medication, &["medication", "medicine", "pill", "ibuprofen", "tylenol", "paracetamol"]),
    (Topic::Thanks, &["thank", "thanks", "that's all", "that helps"]),
];

/// Builds the reply to a post-guidance question.
pub fn follow_up_reply(
    normalized_text: &str,
    context: &HealthContext,
    urgency: Option<UrgencyLevel>,
    recommendations: &[ServiceRecommendation],
) -> String {
    let topic = CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| normalized_text.contains(cue)))
        .map(|(topic, _)| *topic);

    match topic {
        Some(Topic::Worse) => "If your symptoms are getting worse, don't wait for them to settle. \
             Get seen today, and call 911 if you notice trouble breathing, chest pain, \
             confusion or fainting."
            .to_string(),
        Some(Topic::Serious) => match urgency {
            Some(level) => format!(
                "Based on what you've told me, I'd rate this as {}. {}",
                level.label().to_lowercase(),
                level.summary()
            ),
            None => "I don't have enough information yet to say how serious this is.".to_string(),
        },
        Some(Topic::Booking) => match recommendations.first() {
            Some(top) => format!(
                "You can book with {} right from the options above. Pick one and I'll pass \
                 along a summary so you don't have to repeat yourself.",
                top.title
            ),
            None => "Pick one of the options above and I'll help you book.".to_string(),
        },
        Some(Topic::Medication) => {
            let mut reply = "A pharmacist or your clinician can tell you what's safe to take for this."
                .to_string();
            if !context.allergies.is_empty() {
                let allergies: Vec<&str> = context.allergies.iter().map(String::as_str).collect();
                reply.push_str(&format!(" Mention your allergies ({}).", allergies.join(", ")));
            }
            if !context.medications.is_empty() {
                reply.push_str(" Let them know about the medications you already take.");
            }
            reply
        }
        Some(Topic::Thanks) => {
            "You're welcome. I hope you feel better soon. Come back any time if anything changes."
                .to_string()
        }
        None => "I can help you book care, explain what to watch for, or answer other questions \
             about your symptoms. What would you like to know?"
            .to_string(),
    }
}
