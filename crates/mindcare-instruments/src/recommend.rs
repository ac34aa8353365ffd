//! Self-help recommendations and crisis resources keyed on DASS-21 results.

use mindcare_core::models::recommendation::Recommendation;
use mindcare_core::models::subscale::{Subscale, SubscaleResults};

use crate::instruments::dass21::thresholds;

/// Subscale-specific suggestions, offered once a subscale reaches the
/// Moderate band.
pub fn subscale_recommendations(subscale: Subscale) -> Vec<Recommendation> {
    match subscale {
        Subscale::Depression => vec![
            Recommendation::new(
                "Professional Counseling",
                "Consider speaking with a licensed mental health professional who can provide \
                 personalized treatment strategies for depression.",
            ),
            Recommendation::new(
                "Daily Routine",
                "Establish a consistent daily routine with regular sleep, meals, and activities \
                 to help stabilize mood.",
            ),
        ],
        Subscale::Anxiety => vec![
            Recommendation::new(
                "Breathing Exercises",
                "Practice deep breathing techniques and mindfulness meditation to help manage \
                 anxiety symptoms.",
            ),
            Recommendation::new(
                "Gradual Exposure",
                "Gradually face anxiety-provoking situations in a controlled way to build \
                 confidence and reduce avoidance.",
            ),
        ],
        Subscale::Stress => vec![
            Recommendation::new(
                "Stress Management",
                "Learn stress management techniques such as time management, relaxation \
                 exercises, and setting boundaries.",
            ),
            Recommendation::new(
                "Physical Activity",
                "Engage in regular physical exercise, which can significantly reduce stress \
                 levels and improve overall well-being.",
            ),
        ],
    }
}

fn general_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "Social Support",
            "Connect with friends, family, or support groups. Social connections are crucial \
             for mental health recovery.",
        ),
        Recommendation::new(
            "Self-Care Practices",
            "Prioritize self-care activities that you enjoy and that help you relax, such as \
             hobbies, reading, or listening to music.",
        ),
    ]
}

/// Recommendations for a set of results: subscale suggestions for every
/// subscale scoring at or above its Moderate lower bound, then the general
/// suggestions that always apply.
pub fn recommendations(results: &SubscaleResults) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = results
        .iter()
        .filter(|(subscale, result)| result.score >= thresholds(*subscale).moderate)
        .flat_map(|(subscale, _)| subscale_recommendations(subscale))
        .collect();
    out.extend(general_recommendations());
    out
}

/// Crisis contacts surfaced for severe results.
pub fn emergency_resources() -> Vec<Recommendation> {
    vec![
        Recommendation::new("Emergency Services", "If you're in immediate danger, call 911."),
        Recommendation::new(
            "National Suicide Prevention Lifeline",
            "Call or text 988, or call 1-800-273-8255.",
        ),
        Recommendation::new("Crisis Text Line", "Text HOME to 741741."),
        Recommendation::new(
            "National Domestic Violence Hotline",
            "Call 1-800-799-7233.",
        ),
    ]
}

/// First counselor message of a chat session, pitched on the highest
/// subscale score.
pub fn opening_message(first_name: &str, results: &SubscaleResults) -> String {
    let severity = results.max_score();

    let mut message = format!(
        "Hello {first_name}! I'm your AI counselor. Based on your assessment, I'm here to \
         provide personalized support and guidance. "
    );

    if severity >= 21 {
        message.push_str(
            "I notice you're experiencing significant challenges right now. Please know that \
             you're not alone, and seeking help is a brave step. ",
        );
    } else if severity >= 14 {
        message.push_str(
            "I can see you're dealing with some difficulties. It's great that you're taking \
             steps to address your mental health. ",
        );
    } else {
        message.push_str(
            "Your assessment shows you're managing well overall. Let's work together to \
             maintain and improve your mental wellness. ",
        );
    }

    message.push_str("How are you feeling right now, and what would you like to talk about?");
    message
}
