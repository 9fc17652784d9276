// src/cli/handlers/statistics.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::error::{ExecutionError, ParseError};
use crate::models::Priority;

/// Counts over the persons currently displayed.
#[derive(Debug)]
pub struct Statistics;

/// `statistics`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    commons::expect_no_args(args, t!("statistics.usage"))?;
    Ok(Command::new("statistics", Action::Statistics(Statistics)))
}

impl Executable for Statistics {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let view = ctx.book.view();
        let [high, medium, low] = Priority::ALL
            .map(|priority| view.persons.iter().filter(|p| p.priority == priority).count());

        Ok(Feedback::new(format!(
            t!("statistics.success"),
            total = view.person_count(),
            high = high,
            medium = medium,
            low = low
        )))
    }
}
