use anyhow::Context;

use crate::command::{Command, CommandDefinition, CommandResult, CommandType, Input};
use crate::option::{OptionSchema, OptionSpec};

/// `echo <text> [--format plain|upper|json]`
pub struct EchoCommand;

fn render(text: &str, format: &str) -> anyhow::Result<String> {
    match format {
        "upper" => Ok(text.to_uppercase()),
        "json" => serde_json::to_string(text).context("encoding text as JSON"),
        _ => Ok(text.to_string()),
    }
}

impl Command for EchoCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        let text = input.get_str("text").unwrap_or_default();
        let format = input.get_str("format").unwrap_or("plain");
        input.console().write_line(&render(text, format)?);
        Ok(None)
    }
}

impl CommandType for EchoCommand {
    const TYPE_NAME: &'static str = "EchoCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
            .description("Print text back, optionally transformed.")
            .options(
                OptionSchema::new()
                    .option("text", OptionSpec::new("Text to echo").required())
                    .option(
                        "format",
                        OptionSpec::new("Output format")
                            .with_keyed_values([
                                ("plain", "As typed"),
                                ("upper", "Upper case"),
                                ("json", "JSON string"),
                            ])
                            .with_default("plain"),
                    ),
            )
    }

    fn build() -> Self {
        EchoCommand
    }
}
