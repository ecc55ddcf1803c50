use crate::selector::source::RandomSource;
use crate::selector::{SelectorError, WeightedSelector};

/// Trials per run of the fruit machine.
pub const TRIALS: usize = 15;

pub const FRUIT_TABLE: [(&str, u32); 7] = [
    ("Seven", 10),
    ("Bell", 15),
    ("Melon", 20),
    ("Plum", 25),
    ("Orange", 15),
    ("Lemon", 10),
    ("Cherry", 5),
];

pub fn fruit_selector() -> Result<WeightedSelector, SelectorError> {
    WeightedSelector::new(FRUIT_TABLE.to_vec())
}

pub fn fruit_selector_with_source<S: RandomSource>(
    source: S,
) -> Result<WeightedSelector<S>, SelectorError> {
    WeightedSelector::with_source(FRUIT_TABLE.to_vec(), source)
}

pub fn trial_line(label: &str) -> String {
    format!("The chosen fruit corresponds to : {}", label)
}

pub fn summary_lines<S: RandomSource>(selector: &WeightedSelector<S>) -> Vec<String> {
    std::iter::once("Symbol Counts:".to_string())
        .chain(
            selector
                .counts()
                .into_iter()
                .map(|(label, count)| format!("{}: {}", label, count)),
        )
        .collect()
}

/// Runs `trials` draws, emitting one line per pick and then the summary.
pub fn play<S: RandomSource>(
    selector: &mut WeightedSelector<S>,
    trials: usize,
    mut emit: impl FnMut(&str),
) -> Result<(), SelectorError> {
    for _ in 0..trials {
        emit(&trial_line(selector.draw()?));
    }
    for line in summary_lines(selector) {
        emit(&line);
    }
    Ok(())
}
