use adventure_core::model::AnswerChoice;
use services::{ChapterRun, RunPhase};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub choice: AnswerChoice,
    pub letter: char,
    pub text: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub headline: String,
    pub reaction: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub chapter_title: &'static str,
    pub realm_name: &'static str,
    pub position_label: String,
    pub score_label: String,
    /// Chapter scene, shown with the first question only.
    pub intro: Option<String>,
    pub frame: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub feedback: Option<FeedbackVm>,
    pub continue_label: &'static str,
}

/// `None` once the run has no question left to show.
#[must_use]
pub fn map_question(run: &ChapterRun) -> Option<QuestionVm> {
    let question = run.current_question()?;
    let phase = run.phase();

    let options = AnswerChoice::ALL
        .into_iter()
        .map(|choice| {
            let class = match phase {
                RunPhase::Prompt => "option",
                RunPhase::Feedback { .. } if choice == question.correct() => "option correct",
                RunPhase::Feedback { selected, .. } if choice == selected => "option wrong",
                RunPhase::Feedback { .. } => "option muted",
            };
            OptionVm {
                choice,
                letter: choice.letter(),
                text: question.option(choice).to_string(),
                class,
            }
        })
        .collect();

    let feedback = match phase {
        RunPhase::Prompt => None,
        RunPhase::Feedback { correct, .. } => {
            let headline = if correct {
                "Correct!".to_string()
            } else {
                let answer = question.correct();
                format!("The answer was {}: {}", answer.letter(), question.option(answer))
            };
            Some(FeedbackVm {
                correct,
                headline,
                reaction: run.reaction().unwrap_or_default().to_string(),
            })
        }
    };

    let chapter = run.chapter();
    Some(QuestionVm {
        chapter_title: chapter.title(),
        realm_name: chapter.realm.display_name(),
        position_label: format!("Question {} of {}", run.position() + 1, run.total()),
        score_label: format!("{} of {} correct", run.correct(), run.answered()),
        intro: (run.position() == 0 && !run.intro().is_empty()).then(|| run.intro().to_string()),
        frame: run.frame().unwrap_or_default().to_string(),
        prompt: question.prompt().to_string(),
        options,
        feedback,
        continue_label: if run.is_last() { "See results" } else { "Next question" },
    })
}
