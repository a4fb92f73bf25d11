use crate::command::{Command, CommandDefinition, CommandResult, CommandType, Input};
use crate::option::{OptionSchema, OptionSpec};

/// `greet [name] [--shout]`
pub struct GreetCommand;

impl GreetCommand {
    pub fn greeting(name: &str, shout: bool) -> String {
        let greeting = format!("Hello, {}!", name);
        if shout {
            greeting.to_uppercase()
        } else {
            greeting
        }
    }
}

impl Command for GreetCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        let name = input.get_str("name").unwrap_or("world");
        let shout = input.get_bool("shout").unwrap_or(false);
        input.console().write_line(&Self::greeting(name, shout));
        Ok(None)
    }
}

impl CommandType for GreetCommand {
    const TYPE_NAME: &'static str = "GreetCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
            .description("Print a greeting.")
            .options(
                OptionSchema::new()
                    .option(
                        "name",
                        OptionSpec::new("Who should be greeted?")
                            .required()
                            .with_default("world"),
                    )
                    .option("shout", OptionSpec::boolean("Shout the greeting?")),
            )
    }

    fn build() -> Self {
        GreetCommand
    }
}
