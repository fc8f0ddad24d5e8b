//! GlorpCat Terminal - a tiny shell over a command registry

use chrono::Local;
use tracing::debug;

const BANNER: [&str; 2] = [
    "Welcome to GlorpCat Terminal v1.0",
    "Type 'help' for a list of commands.",
];

/// What a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Lines to append
    Text(String),
    /// Wipe the screen
    Clear,
}

type Handler = fn(&CommandRegistry) -> CommandOutput;

struct CommandSpec {
    name: &'static str,
    description: &'static str,
    handler: Handler,
}

/// Command name to typed handler, in help order
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    /// Registry with no commands
    pub fn empty() -> Self {
        Self { commands: Vec::new() }
    }

    /// Add or replace a command
    pub fn register(&mut self, name: &'static str, description: &'static str, handler: Handler) {
        self.commands.retain(|c| c.name != name);
        self.commands.push(CommandSpec {
            name,
            description,
            handler,
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name)
    }

    /// Run a command by name, `None` when unknown
    pub fn run(&self, name: &str) -> Option<CommandOutput> {
        let spec = self.commands.iter().find(|c| c.name == name)?;
        Some((spec.handler)(self))
    }

    fn help_text(&self) -> String {
        let mut text = String::from("Available commands:");
        for spec in &self.commands {
            text.push_str(&format!("\n- {}: {}", spec.name, spec.description));
        }
        text
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("help", "Show this help", |r| CommandOutput::Text(r.help_text()));
        registry.register("clear", "Clear terminal", |_| CommandOutput::Clear);
        registry.register("date", "Show current date", |_| {
            CommandOutput::Text(Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        });
        registry.register("whoami", "Show current user", |_| CommandOutput::Text("glorpcat".into()));
        registry.register("glorp", "Show glorp info", |_| {
            CommandOutput::Text("GLORP TO THE MOON! 🚀".into())
        });
        registry
    }
}

/// Terminal screen state
pub struct Terminal {
    registry: CommandRegistry,
    lines: Vec<String>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::with_registry(CommandRegistry::default())
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            registry,
            lines: BANNER.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Execute one input line.
    ///
    /// The command is echoed, then its output (or a not-found line for
    /// unknown non-empty input), then a blank separator line.
    pub fn execute(&mut self, input: &str) -> Option<CommandOutput> {
        let command = input.trim().to_lowercase();
        self.lines.push(format!("$ {command}"));

        let output = self.registry.run(&command);
        match &output {
            Some(CommandOutput::Clear) => self.lines.clear(),
            Some(CommandOutput::Text(text)) => self.lines.extend(text.lines().map(str::to_string)),
            None if !command.is_empty() => {
                debug!(command = %command, "Unknown terminal command");
                self.lines.push(format!("Command not found: {command}"));
            }
            None => {}
        }
        self.lines.push(String::new());
        output
    }

    /// Screen contents, one entry per line
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn screen(&self) -> String {
        self.lines.join("\n")
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        let terminal = Terminal::new();
        assert_eq!(terminal.lines()[0], "Welcome to GlorpCat Terminal v1.0");
    }

    #[test]
    fn test_help_lists_commands_in_order() {
        let mut terminal = Terminal::new();
        terminal.execute("help");
        assert_eq!(
            &terminal.lines()[2..],
            &[
                "$ help",
                "Available commands:",
                "- help: Show this help",
                "- clear: Clear terminal",
                "- date: Show current date",
                "- whoami: Show current user",
                "- glorp: Show glorp info",
                "",
            ]
        );
    }

    #[test]
    fn test_input_is_normalized() {
        let mut terminal = Terminal::new();
        let output = terminal.execute("  WhoAmI ");
        assert_eq!(output, Some(CommandOutput::Text("glorpcat".into())));
        assert!(terminal.lines().contains(&"$ whoami".to_string()));
    }

    #[test]
    fn test_unknown_and_empty() {
        let mut terminal = Terminal::new();
        assert_eq!(terminal.execute("rm -rf"), None);
        assert!(terminal.screen().ends_with("$ rm -rf\nCommand not found: rm -rf\n"));

        let before = terminal.lines().len();
        terminal.execute("   ");
        assert_eq!(terminal.lines().len(), before + 2);
    }

    #[test]
    fn test_clear_wipes_screen() {
        let mut terminal = Terminal::new();
        terminal.execute("glorp");
        terminal.execute("clear");
        assert_eq!(terminal.lines(), &[String::new()]);
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = CommandRegistry::empty();
        registry.register("ping", "Reply with pong", |_| CommandOutput::Text("pong".into()));
        let mut terminal = Terminal::with_registry(registry);

        assert_eq!(terminal.execute("ping"), Some(CommandOutput::Text("pong".into())));
        assert_eq!(terminal.execute("help"), None);
    }
}
