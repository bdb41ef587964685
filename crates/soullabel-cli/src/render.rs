//! Plain-text screens. Everything here is a pure function of session state.

use soullabel_core::{DisplayStats, Question, QuizSession};

const BAR_WIDTH: usize = 30;

/// `[#####.....]` for a 0..=100 value.
pub fn bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn welcome(session: &QuizSession) -> String {
    let title = match session.data().title.as_str() {
        "" => "Soul Label",
        title => title,
    };
    format!(
        "{title}\n\n{} deep questions reveal the label hiding in your subconscious.\n",
        session.question_count()
    )
}

pub fn question(session: &QuizSession, question: &Question) -> String {
    let mut out = format!(
        "{} Question {}/{}\n{}\n",
        bar(
            ((session.question_index() + 1) * 100 / session.question_count()) as u32,
            BAR_WIDTH / 2
        ),
        session.question_index() + 1,
        session.question_count(),
        question.text
    );
    for (i, option) in question.options.iter().enumerate() {
        out.push_str(&format!("  {}) {}\n", i + 1, option.text));
    }
    out
}

pub fn analyzing(session: &QuizSession) -> String {
    format!(
        "{} {:>3}%  {}...",
        bar(session.display_progress(), BAR_WIDTH),
        session.display_progress(),
        session.analysis_phase().message()
    )
}

pub fn stats(stats: &DisplayStats) -> String {
    stats
        .iter()
        .map(|(label, value)| format!("  {label:<8} {} {value:>3}%\n", bar(value as u32, 20)))
        .collect()
}

pub fn result(session: &QuizSession) -> String {
    format!(
        "\nAfter careful analysis, {}'s true composition is:\n\n    {}\n\n{}",
        session.profile().nickname,
        session.result_tag().unwrap_or("?"),
        stats(&session.stats())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0, 10), "[..........]");
        assert_eq!(bar(50, 10), "[#####.....]");
        assert_eq!(bar(100, 10), "[##########]");
        assert_eq!(bar(130, 10), "[##########]");
    }

    #[test]
    fn stats_lists_all_four() {
        let text = stats(&DisplayStats {
            emotion: 70,
            social: 40,
            purity: 15,
            defense: 99,
        });
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("defense"));
        assert!(text.contains(" 99%"));
    }
}
