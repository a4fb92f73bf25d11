use chrono::{Local, NaiveDate};

use crate::command::{Command, CommandDefinition, CommandResult, CommandType, Input};
use crate::option::{OptionSchema, OptionSpec};
use crate::CODE_ERROR;

/// `calendar.days_until <date>`
pub struct DaysUntilCommand;

impl DaysUntilCommand {
    pub fn describe(today: NaiveDate, target: NaiveDate) -> String {
        let days = (target - today).num_days();
        match days {
            0 => format!("{} is today", target),
            1 => format!("1 day until {}", target),
            -1 => format!("{} was 1 day ago", target),
            n if n > 0 => format!("{} days until {}", n, target),
            n => format!("{} was {} days ago", target, -n),
        }
    }
}

impl Command for DaysUntilCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        let Some(target) = input.value::<NaiveDate>("date") else {
            input.console().error("A date is required");
            return Ok(Some(CODE_ERROR));
        };
        let today = Local::now().date_naive();
        input.console().write_line(&Self::describe(today, target));
        Ok(None)
    }
}

impl CommandType for DaysUntilCommand {
    const TYPE_NAME: &'static str = "DaysUntilCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
            .description("Count the days until a date.")
            .options(OptionSchema::new().option(
                "date",
                OptionSpec::new("Target date (YYYY-MM-DD)")
                    .of_type("date")
                    .required(),
            ))
    }

    fn build() -> Self {
        DaysUntilCommand
    }
}
