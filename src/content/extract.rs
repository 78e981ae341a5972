//! Question/answer extraction from generated prose
//!
//! Recognized shapes, per line:
//!
//! ```text
//! Q: Do you take walk-ins?          Question: ...      Vraag: ...
//! A: Yes, every weekday morning.    Answer: ...        Antwoord: ...
//!
//! Q: Is there parking? A: Behind the building.
//!
//! **Is parking available?**        (bold or heading lines ending in '?')
//! There is free parking behind the building.
//! ```
//!
//! Bullet markers, list numbers, heading hashes and bold markers are
//! stripped before matching. An unprefixed line ending in '?' is plain
//! prose unless it is bold or a heading. An answer runs until the next
//! question, a blank line after some answer text, or the end of its block.
//! Intro, secondary text and bullets are separate blocks.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::narrative::Narrative;
use super::Faq;

static QUESTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:q|question|vraag|frage)\s*[:.]\s*(.+)$").unwrap()
});

static ANSWER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:a|answer|antwoord|antwort|réponse)\s*[:.]\s*(.*)$").unwrap()
});

/// `... ? A: ...` on the question line
static INLINE_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?\?)\s*\**\s*(?:a|answer|antwoord|antwort|réponse)\s*\**\s*:\s*\**\s*(.*)$",
    )
    .unwrap()
});

static LINE_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:#{1,6}\s*|[-*•]\s+|\d+[.)]\s+)").unwrap());

enum Line {
    Blank,
    Question(String),
    Answer(String),
    Pair(String, String),
    Text(String),
}

fn strip_bold(text: &str) -> String {
    text.trim().trim_matches('*').trim().to_string()
}

fn classify(raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    let undecorated = LINE_DECORATION.replace(trimmed, "");
    let emphasized = trimmed.starts_with('#') || undecorated.trim_start().starts_with("**");
    let line = undecorated.trim().trim_matches('*').trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = QUESTION_PREFIX.captures(line) {
        if let Some(inline) = INLINE_ANSWER.captures(&caps[1]) {
            return Line::Pair(strip_bold(&inline[1]), strip_bold(&inline[2]));
        }
        return Line::Question(strip_bold(&caps[1]));
    }
    if let Some(caps) = ANSWER_PREFIX.captures(line) {
        return Line::Answer(strip_bold(&caps[1]));
    }
    if emphasized && line.ends_with('?') {
        return Line::Question(line.to_string());
    }
    Line::Text(line.to_string())
}

struct Pending {
    question: String,
    answer: Vec<String>,
}

/// Extract FAQ pairs from a generated narrative
pub fn extract_faqs(narrative: &Narrative) -> Vec<Faq> {
    let bullets = narrative.bullets.join("\n");
    let blocks = [narrative.intro.as_str(), narrative.secondary.as_str(), bullets.as_str()];

    let mut faqs = Vec::new();
    let mut seen = HashSet::new();

    let mut flush = |pending: &mut Option<Pending>, faqs: &mut Vec<Faq>| {
        if let Some(p) = pending.take() {
            let answer = p.answer.join(" ");
            if !answer.is_empty() && seen.insert(p.question.to_lowercase()) {
                faqs.push(Faq {
                    question: p.question,
                    answer,
                });
            }
        }
    };

    for block in blocks {
        let mut pending: Option<Pending> = None;

        for raw in block.lines() {
            match classify(raw) {
                Line::Question(question) => {
                    flush(&mut pending, &mut faqs);
                    pending = Some(Pending {
                        question,
                        answer: Vec::new(),
                    });
                }
                Line::Pair(question, answer) => {
                    flush(&mut pending, &mut faqs);
                    pending = Some(Pending {
                        question,
                        answer: [answer].into_iter().filter(|a| !a.is_empty()).collect(),
                    });
                }
                Line::Answer(text) | Line::Text(text) => {
                    if let Some(p) = pending.as_mut() {
                        if !text.is_empty() {
                            p.answer.push(text);
                        }
                    }
                }
                Line::Blank => {
                    if pending.as_ref().is_some_and(|p| !p.answer.is_empty()) {
                        flush(&mut pending, &mut faqs);
                    }
                }
            }
        }
        flush(&mut pending, &mut faqs);
    }

    faqs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrative(secondary: &str) -> Narrative {
        Narrative {
            intro: "Happy Paws Vet is a clinic in San Jose.".into(),
            secondary: secondary.into(),
            bullets: vec![],
        }
    }

    #[test]
    fn prefixed_pairs() {
        let faqs = extract_faqs(&narrative(
            "Q: Do you take walk-ins?\nA: Yes, on weekday mornings.\n\nQ: Is there parking?\nA: Free parking behind the building.",
        ));
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "Do you take walk-ins?");
        assert_eq!(faqs[0].answer, "Yes, on weekday mornings.");
        assert_eq!(faqs[1].answer, "Free parking behind the building.");
    }

    #[test]
    fn bold_questions_with_multiline_answers() {
        let faqs = extract_faqs(&narrative(
            "**Do you treat exotic pets?**\nWe treat rabbits and birds.\nReptiles by appointment.\n\nClosing paragraph of prose.",
        ));
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "Do you treat exotic pets?");
        assert_eq!(
            faqs[0].answer,
            "We treat rabbits and birds. Reptiles by appointment."
        );
    }

    #[test]
    fn dutch_prefixes_and_headings() {
        let faqs = extract_faqs(&narrative(
            "### Vraag: Zijn jullie open op zondag?\nAntwoord: Nee.\n- Vraag: Kan ik online boeken?\n- Antwoord: Ja, via de website.",
        ));
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "Zijn jullie open op zondag?");
        assert_eq!(faqs[1].answer, "Ja, via de website.");
    }

    #[test]
    fn questions_without_answers_are_dropped() {
        let faqs = extract_faqs(&narrative("Why choose us?\n\nQ: What about parking?"));
        assert!(faqs.is_empty());
    }

    #[test]
    fn duplicate_questions_keep_first() {
        let faqs = extract_faqs(&narrative(
            "Q: Open late?\nA: Until 9pm.\nQ: open late?\nA: Sometimes.",
        ));
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].answer, "Until 9pm.");
    }

    #[test]
    fn bullets_are_scanned() {
        let n = Narrative {
            intro: String::new(),
            secondary: String::new(),
            bullets: vec![
                "Q: Do you offer vaccinations?".into(),
                "A: Yes, for cats and dogs.".into(),
            ],
        };
        assert_eq!(extract_faqs(&n).len(), 1);
    }

    #[test]
    fn plain_prose_yields_nothing() {
        let faqs = extract_faqs(&narrative(
            "A trusted clinic with modern equipment.\nOpen six days a week.",
        ));
        assert!(faqs.is_empty());
    }

    #[test]
    fn bold_prefixes_are_stripped_from_answers() {
        let faqs = extract_faqs(&narrative(
            "**Q:** Do you take walk-ins?\n**A:** Yes, every morning.\n**Q:** Is there parking?\n**A:** Behind the building.",
        ));
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "Do you take walk-ins?");
        assert_eq!(faqs[0].answer, "Yes, every morning.");
        assert_eq!(faqs[1].question, "Is there parking?");
        assert_eq!(faqs[1].answer, "Behind the building.");
    }

    #[test]
    fn inline_pairs_on_one_line() {
        let faqs = extract_faqs(&narrative(
            "Q: Do you take walk-ins? A: Yes.\nQ: Is there parking? **Antwoord:** Behind the building.",
        ));
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "Do you take walk-ins?");
        assert_eq!(faqs[0].answer, "Yes.");
        assert_eq!(faqs[1].question, "Is there parking?");
        assert_eq!(faqs[1].answer, "Behind the building.");
    }

    #[test]
    fn rhetorical_intro_is_not_a_question() {
        let n = Narrative {
            intro: "Looking for a trusted vet in San Jose?".into(),
            secondary: "Happy Paws Vet has served the city since 1998.".into(),
            bullets: vec![],
        };
        assert!(extract_faqs(&n).is_empty());

        let n = Narrative {
            secondary: "Q: Do you see cats?\nA: Every day.".into(),
            ..n
        };
        assert_eq!(extract_faqs(&n).len(), 1);
    }

    #[test]
    fn emphasized_question_does_not_reach_into_next_block() {
        let n = Narrative {
            intro: "**Why choose Happy Paws?**".into(),
            secondary: "Happy Paws Vet has served the city since 1998.".into(),
            bullets: vec![],
        };
        assert!(extract_faqs(&n).is_empty());
    }
}
