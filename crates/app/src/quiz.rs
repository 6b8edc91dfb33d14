//! Line-oriented quiz loop: renders prompts and feeds answers to the trainer.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use services::{
    Answer, Evaluation, Presentation, PromptKind, SelfGrade, SessionProgress, Trainer,
};
use vocab_core::model::QuizMode;

/// What the learner typed, already interpreted for the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Quit,
    Shuffle,
    Restart,
    Reveal,
    Grade(SelfGrade),
    Answer(Answer),
    Unknown,
}

fn interpret(line: &str, mode: QuizMode) -> Input {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" => return Input::Quit,
        ":shuffle" => return Input::Shuffle,
        ":restart" => return Input::Restart,
        ":reveal" | ":flip" => return Input::Reveal,
        _ => {}
    }
    match mode {
        QuizMode::Flashcard => match trimmed {
            "" | "f" => Input::Reveal,
            "y" => Input::Grade(SelfGrade::KnewIt),
            "n" | "s" => Input::Grade(SelfGrade::NeedsPractice),
            _ => Input::Unknown,
        },
        QuizMode::MultipleChoice => match trimmed.parse::<usize>() {
            Ok(number) if number > 0 => Input::Answer(Answer::Choice(number - 1)),
            _ => Input::Unknown,
        },
        QuizMode::Typed => Input::Answer(Answer::Typed(line.to_owned())),
    }
}

fn progress_line(progress: &SessionProgress) -> String {
    format!(
        "[{}/{} • ✓ {} • {}%]",
        progress.answered(),
        progress.total,
        progress.session_correct,
        progress.percent()
    )
}

fn render_prompt(out: &mut impl Write, kind: &PromptKind) -> io::Result<()> {
    match kind {
        PromptKind::Flashcard { front } => {
            writeln!(out, "{front}")?;
            writeln!(out, "  enter/f: show meaning   y: I knew it   n: I need practice")
        }
        PromptKind::MultipleChoice { question, choices } => {
            writeln!(out, "{question}")?;
            for (index, option) in choices.options().iter().enumerate() {
                writeln!(out, "  {}) {option}", index + 1)?;
            }
            Ok(())
        }
        PromptKind::Typed { meaning } => {
            writeln!(out, "{meaning}")?;
            writeln!(out, "  type the German word with its article (e.g. der Hund)")
        }
    }
}

fn render_feedback(out: &mut impl Write, eval: &Evaluation) -> io::Result<()> {
    match eval.outcome {
        None => writeln!(out, "→ {}", eval.expected.join(" | "))?,
        Some(outcome) if outcome.is_correct() => writeln!(out, "✅ Correct")?,
        Some(_) => writeln!(out, "❌ Wrong. Correct options: {}", eval.expected.join(" | "))?,
    }
    if let Some(plural) = eval.plural.as_ref().filter(|_| !eval.is_correct()) {
        writeln!(out, "   Plural: {plural}")?;
    }
    if let Some(err) = eval.persist.warning() {
        writeln!(out, "   (progress not saved: {err})")?;
    }
    Ok(())
}

/// Drive an already started session until the learner quits or input ends.
///
/// # Errors
///
/// Returns I/O errors from reading input or writing output.
pub fn run_quiz(
    trainer: &mut Trainer,
    input: impl BufRead,
    out: &mut impl Write,
    feedback_delay: Duration,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        let mode = trainer.engine().mode().unwrap_or_default();
        let presentation = match trainer.present() {
            Ok(presentation) => presentation,
            Err(err) => {
                writeln!(out, "{err}")?;
                return Ok(());
            }
        };

        match &presentation {
            Presentation::Finished(progress) => {
                writeln!(out, "Session finished 🎉 {}", progress_line(progress))?;
                writeln!(out, "  :restart to go again, :shuffle for a new order, :q to quit")?;
            }
            Presentation::Item(prompt) => {
                writeln!(out, "{}", progress_line(&trainer.engine().progress()))?;
                render_prompt(out, &prompt.kind)?;
            }
        }
        out.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        match interpret(&line, mode) {
            Input::Quit => return Ok(()),
            Input::Unknown => writeln!(out, "?")?,
            Input::Shuffle => {
                if let Err(err) = trainer.shuffle() {
                    writeln!(out, "{err}")?;
                }
            }
            Input::Restart => {
                if let Err(err) = trainer.restart() {
                    writeln!(out, "{err}")?;
                }
            }
            Input::Reveal => match trainer.reveal() {
                Ok(reveal) => {
                    let plural = reveal
                        .plural
                        .map(|p| format!(" • Plural: {p}"))
                        .unwrap_or_default();
                    writeln!(out, "→ {}{plural}", reveal.answer)?;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            Input::Grade(grade) => match trainer.self_grade(grade) {
                Ok(eval) => render_feedback(out, &eval)?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Input::Answer(answer) => match trainer.answer(answer) {
                Ok(eval) => {
                    render_feedback(out, &eval)?;
                    out.flush()?;
                    // Leave the feedback on screen before the next prompt.
                    std::thread::sleep(feedback_delay);
                }
                Err(err) => writeln!(out, "{err}")?,
            },
        }
    }
}
