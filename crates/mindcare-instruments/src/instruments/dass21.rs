use std::sync::LazyLock;

use mindcare_core::models::subscale::{SeverityLevel, Subscale, SubscaleResult, SubscaleResults};

use crate::scoring::{Item, ScoreRange, Thresholds};
use crate::Instrument;

/// DASS-21: Depression, Anxiety and Stress Scales, 21-item short form,
/// worded for the workplace. Each item is rated 0-3; each subscale sums
/// seven items and doubles the total to match the 42-item scale.
pub struct Dass21;

pub const ITEM_COUNT: usize = 21;

pub const ANSWER_RANGE: ScoreRange = ScoreRange { min: 0, max: 3 };

/// Answer labels, indexed by answer value.
pub const ANSWER_LABELS: [&str; 4] = [
    "Did not apply to me at all",
    "Applied to me to some degree, or some of the time",
    "Applied to me to a considerable degree, or a good part of the time",
    "Applied to me very much, or most of the time",
];

const DEPRESSION_ITEMS: [usize; 7] = [2, 4, 9, 12, 15, 16, 20];
const ANXIETY_ITEMS: [usize; 7] = [1, 3, 6, 8, 14, 18, 19];
const STRESS_ITEMS: [usize; 7] = [0, 5, 7, 10, 11, 13, 17];

const ITEM_TEXTS: [&str; ITEM_COUNT] = [
    "I found it difficult to mentally disconnect from work, even after office hours.",
    "I noticed physical signs of stress, such as a dry mouth, during high-pressure meetings or tasks.",
    "I struggled to find any satisfaction or enjoyment in my recent work achievements.",
    "I experienced shortness of breath or rapid breathing during work-related stress without physical activity.",
    "I lacked motivation or energy to start work-related tasks, even those that were important.",
    "I tended to react more strongly than usual to minor workplace challenges or changes.",
    "I experienced physical trembling (e.g., hands shaking) during work-related stress.",
    "I felt like I was using up a lot of mental and emotional energy just to keep up with work demands.",
    "I worried that I might lose control or embarrass myself in professional settings like meetings or presentations.",
    "I felt like there was nothing professionally or personally to look forward to in the near future.",
    "I found myself feeling irritable or restless during the workday, even without a clear reason.",
    "I struggled to relax or calm down during breaks or after completing my work.",
    "I felt persistently low or emotionally drained, even after time off or weekends.",
    "I became easily frustrated when something or someone interrupted my work progress.",
    "I felt on the verge of panic during high-pressure work situations, such as deadlines or evaluations.",
    "I couldn't get excited or interested in projects, even those I normally enjoy.",
    "I felt that my contributions at work didn't matter or that I lacked value as an employee.",
    "I was emotionally sensitive and easily upset by feedback or workplace interactions.",
    "I could feel my heart racing or skipping beats even when I was just sitting at my desk under stress.",
    "I felt sudden fear or anxiety during the workday without a clear or logical reason.",
    "I often questioned the purpose of my work or felt that it had no real meaning.",
];

impl Instrument for Dass21 {
    fn id(&self) -> &str {
        "dass21"
    }

    fn name(&self) -> &str {
        "DASS-21"
    }

    fn items(&self) -> &[Item] {
        static ITEMS: LazyLock<Vec<Item>> = LazyLock::new(|| {
            let mut items: Vec<Item> = Subscale::ALL
                .into_iter()
                .flat_map(|subscale| {
                    item_indices(subscale).iter().map(move |&index| Item {
                        index,
                        text: ITEM_TEXTS[index].to_string(),
                        subscale,
                    })
                })
                .collect();
            items.sort_by_key(|item| item.index);
            items
        });
        &ITEMS
    }

    fn item_range(&self) -> ScoreRange {
        ANSWER_RANGE
    }
}

/// The seven answer positions that feed `subscale`.
///
/// The three sets are disjoint and together cover every position.
pub fn item_indices(subscale: Subscale) -> &'static [usize; 7] {
    match subscale {
        Subscale::Depression => &DEPRESSION_ITEMS,
        Subscale::Anxiety => &ANXIETY_ITEMS,
        Subscale::Stress => &STRESS_ITEMS,
    }
}

/// Which subscale an answer position belongs to.
pub fn subscale_of(index: usize) -> Option<Subscale> {
    Subscale::ALL
        .into_iter()
        .find(|s| item_indices(*s).contains(&index))
}

/// Severity band lower bounds for `subscale`.
pub fn thresholds(subscale: Subscale) -> Thresholds {
    match subscale {
        Subscale::Depression => Thresholds {
            mild: 10,
            moderate: 14,
            severe: 21,
            extremely_severe: 28,
        },
        Subscale::Anxiety => Thresholds {
            mild: 8,
            moderate: 10,
            severe: 15,
            extremely_severe: 20,
        },
        Subscale::Stress => Thresholds {
            mild: 15,
            moderate: 19,
            severe: 26,
            extremely_severe: 34,
        },
    }
}

/// Severity level for a subscale score.
///
/// Total over `i32`: scores above 42 are Extremely Severe, negative scores
/// fall below every band and are Normal.
pub fn classify(subscale: Subscale, score: i32) -> SeverityLevel {
    thresholds(subscale).classify(score)
}

/// Twice the sum of the subscale's answers. Positions past the end of
/// `answers` count as 0; arithmetic saturates rather than overflowing.
pub fn subscale_score(subscale: Subscale, answers: &[i32]) -> i32 {
    item_indices(subscale)
        .iter()
        .map(|&i| answers.get(i).copied().unwrap_or(0))
        .fold(0i32, i32::saturating_add)
        .saturating_mul(2)
}

/// Score all three subscales.
///
/// Never fails. Short answer sets and out-of-range values are scored as
/// given; strict checking is [`Instrument::validate_answers`]'s job.
pub fn compute_scores(answers: &[i32]) -> SubscaleResults {
    let result = |subscale| {
        let score = subscale_score(subscale, answers);
        SubscaleResult {
            score,
            level: classify(subscale, score),
        }
    };

    SubscaleResults {
        depression: result(Subscale::Depression),
        anxiety: result(Subscale::Anxiety),
        stress: result(Subscale::Stress),
    }
}
