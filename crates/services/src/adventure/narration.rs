//! Story text shown around questions and results.

use adventure_core::model::{ChapterKey, Difficulty, Realm};
use rand::Rng;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, lines: &[&'a str]) -> &'a str {
    lines[rng.random_range(0..lines.len())]
}

/// Mentor's verdict at the end of a chapter.
pub fn chapter_verdict<R: Rng + ?Sized>(
    realm: Realm,
    accuracy: f64,
    passed: bool,
    rng: &mut R,
) -> String {
    let mentor = realm.mentor();
    let place = realm.display_name();
    if passed {
        let template = pick(
            rng,
            &[
                "\"Splendid work!\" says {mentor}. \"{acc}% is worthy of {place}.\"",
                "The lanterns of {place} blaze brighter. {mentor} nods: \"{acc}%, a true word-warrior.\"",
                "{mentor} bows low. \"With {acc}% you have unlocked this chapter's secrets.\"",
                "All of {place} cheers! \"{acc}%,\" {mentor} announces, \"the old books will remember this.\"",
            ],
        );
        fill(template, mentor, place, accuracy)
    } else {
        let template = pick(
            rng,
            &[
                "\"Fear not,\" says {mentor} kindly. \"{acc}% shows promise. Practise and return when ready.\"",
                "{mentor} smiles. \"{acc}% is real progress, but this gate opens at 89%. Try again!\"",
                "\"So close!\" whispers {mentor}. \"{acc}% today, more tomorrow. {place} will wait for you.\"",
                "\"Every explorer stumbles,\" says {mentor}. \"{acc}% is a fine first step on this path.\"",
            ],
        );
        fill(template, mentor, place, accuracy)
    }
}

/// Short reaction after a single answer.
pub fn answer_reaction<R: Rng + ?Sized>(realm: Realm, correct: bool, rng: &mut R) -> String {
    let mentor = realm.mentor();
    let line = if correct {
        pick(
            rng,
            &[
                "Right answer! {mentor} looks delighted.",
                "Correct! The path ahead lights up.",
                "Well done! {mentor} makes a note in the great ledger.",
            ],
        )
    } else {
        pick(
            rng,
            &[
                "Not quite. {mentor} points out the right answer with a smile.",
                "A detour! Every wrong turn teaches the map.",
                "Close, but no. {mentor} says: \"Remember this one for next time.\"",
            ],
        )
    };
    line.replace("{mentor}", mentor)
}

/// Scene that opens a chapter; one fixed text per realm and difficulty.
#[must_use]
pub fn chapter_intro(chapter: ChapterKey) -> String {
    use Difficulty::{Easy, Hard, Medium};
    let line = match (chapter.realm, chapter.difficulty) {
        (Realm::Grammar, Easy) => {
            "Sunlight slants through the oaks of {title}. {mentor} waves you closer: these first riddles are gentle, and the forest will guide you deeper once they are solved."
        }
        (Realm::Grammar, Medium) => {
            "The path narrows into {title}, where the branches mutter harder puzzles. {mentor} adjusts a pair of spectacles and promises that the magic grows stronger here."
        }
        (Realm::Grammar, Hard) => {
            "You stand at last in {title}. The oldest trees hold the deepest rules of the language, and {mentor} warns that only true mastery opens them."
        }
        (Realm::Articles, Easy) => {
            "The great doors swing open onto {title}. {mentor} sets out a row of glowing scrolls, each one missing a small but important word."
        }
        (Realm::Articles, Medium) => {
            "Up the marble stairs lies {title}, where manuscripts drift through the air. {mentor} nods: you are ready for trickier pages now."
        }
        (Realm::Articles, Hard) => {
            "Behind golden doors waits {title}. Few scholars get this far, and {mentor} speaks in a whisper among the oldest texts."
        }
        (Realm::Synonyms, Easy) => {
            "Butterflies drift across {title}. {mentor} laughs and explains that every flower here says the same thing in a different voice."
        }
        (Realm::Synonyms, Medium) => {
            "In {title} the creatures of the meadow gather around you. {mentor} sings that deeper here, words begin to dance as one."
        }
        (Realm::Synonyms, Hard) => {
            "You reach {title}, where every voice is in perfect harmony. {mentor} asks you to hear the closest ties between words."
        }
        (Realm::Antonyms, Easy) => {
            "Your boat scrapes onto the shore of {title}. {mentor} points to a line of still pools that reflect everything backwards."
        }
        (Realm::Antonyms, Medium) => {
            "On {title} the mirrors show stranger reversals. {mentor} chuckles that the islands only get odder from here."
        }
        (Realm::Antonyms, Hard) => {
            "At {title} the world itself seems to turn inside out. {mentor} turns serious: only those who truly know opposites may pass."
        }
        (Realm::Sentences, Easy) => {
            "You enter {title} of the citadel. {mentor} hands you the first foundation stones and asks you to lay them straight."
        }
        (Realm::Sentences, Medium) => {
            "Inside {title} arches of clauses rise overhead. {mentor} unrolls plans for larger structures."
        }
        (Realm::Sentences, Hard) => {
            "At the end of the road lies {title}. {mentor} bows: here every sentence must be built without a single flaw."
        }
    };
    line.replace("{title}", chapter.title())
        .replace("{mentor}", chapter.realm.mentor())
}

/// Lead-in spoken before a question.
pub fn question_frame<R: Rng + ?Sized>(realm: Realm, rng: &mut R) -> String {
    let line = match realm {
        Realm::Grammar => pick(
            rng,
            &[
                "An old oak rustles its leaves and asks:",
                "{mentor} appears in a flicker of golden light:",
                "A forest sprite giggles and sets a challenge:",
            ],
        ),
        Realm::Articles => pick(
            rng,
            &[
                "A scroll unrolls with a gap in its lines:",
                "{mentor} slides a worn manuscript across the desk:",
                "A page floats down from the top shelf:",
            ],
        ),
        Realm::Synonyms => pick(
            rng,
            &[
                "A butterfly lands on your shoulder and whispers:",
                "The garden flowers start to hum:",
                "{mentor} smiles and asks:",
            ],
        ),
        Realm::Antonyms => pick(
            rng,
            &[
                "Your reflection in the water poses a riddle:",
                "{mentor} points across the bay:",
                "A parrot that says everything backwards squawks:",
            ],
        ),
        Realm::Sentences => pick(
            rng,
            &[
                "Golden letters glow on the citadel door:",
                "{mentor} taps a blueprint:",
                "The building blocks shuffle themselves and ask:",
            ],
        ),
    };
    line.replace("{mentor}", realm.mentor())
}

/// Advice that steers the learner towards their weakest realm.
#[must_use]
pub fn weakness_advice(player_name: &str, realm: Realm, confidence: f64) -> String {
    format!(
        "{player_name}, the signs point to {} as your best place to grow ({:.0}% sure). {} is ready to guide you there.",
        realm.display_name(),
        confidence * 100.0,
        realm.mentor()
    )
}

fn fill(template: &str, mentor: &str, place: &str, accuracy: f64) -> String {
    template
        .replace("{mentor}", mentor)
        .replace("{place}", place)
        .replace("{acc}", &format!("{accuracy:.1}"))
}
