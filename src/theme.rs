use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::LooperToInterfaceMessage;

const HELP: &str = "\
🔧 Available Commands:
- Project Creation: \"Create a [framework] app with [features]\"
- Feature Addition: \"Add [feature] to my project\"
- File Operations: \"Read [filename]\", \"Create [filename] with [content]\"
- Commands: \"Install [package]\", \"Run [command]\"
- Structure: \"Show project structure\", \"List files\"
- Navigation: \"Change to [directory]\", \"Show current directory\"
- Weather: \"What is the weather in [city]\"
- Leave: exit, quit, bye";

pub struct Theme {
    pub plan: Style,
    pub tool: Style,
    pub observe: Style,
    pub output: Style,
    pub error: Style,
    pub warning: Style,
    pub separator: Style,
    pub prompt: Style,
    pub greeting: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            plan: Style::new().green().dim().italic(),
            tool: Style::new().yellow(),
            observe: Style::new().cyan(),
            output: Style::new().green().bold(),
            error: Style::new().red(),
            warning: Style::new().yellow().bold(),
            separator: Style::new().green().dim(),
            prompt: Style::new().green().bold(),
            greeting: Style::new().green().bold(),
        }
    }
}

impl Theme {
    pub fn greeting(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.greeting.apply_to("🚀 Looper: full-stack development agent"),
            "Examples: 'Create a React todo app', 'Set up a Python Flask server', 'List files'",
            self.separator_line(),
        )
    }

    pub fn prompt(&self) -> String {
        format!("\n{}", self.prompt.apply_to("💻 > "))
    }

    pub fn separator_line(&self) -> String {
        self.separator.apply_to("─".repeat(80)).to_string()
    }

    /// Printable form of an interface message; `None` for control messages.
    pub fn render(&self, message: &LooperToInterfaceMessage) -> Option<String> {
        let line = match message {
            LooperToInterfaceMessage::Plan(m) => {
                format!("🧠 {}", self.plan.apply_to(format!("Planning: {m}")))
            }
            LooperToInterfaceMessage::ToolCall(name) => {
                format!("🛠️  Executing: {}", self.tool.apply_to(name))
            }
            LooperToInterfaceMessage::Observe(m) => {
                format!("👀 {}", self.observe.apply_to(format!("Observing: {m}")))
            }
            LooperToInterfaceMessage::Output(m) => {
                format!("✅ {}", self.output.apply_to(format!("Result: {m}")))
            }
            LooperToInterfaceMessage::Other(m) => format!("🤖 {m}"),
            LooperToInterfaceMessage::Error(m) => format!("❌ {}", self.error.apply_to(m)),
            LooperToInterfaceMessage::Warning(m) => format!("⚠️  {}", self.warning.apply_to(m)),
            LooperToInterfaceMessage::Help => HELP.to_string(),
            LooperToInterfaceMessage::Goodbye => "👋 Goodbye! Happy coding!".to_string(),
            LooperToInterfaceMessage::Thinking | LooperToInterfaceMessage::TurnComplete => return None,
        };
        Some(line)
    }

    pub fn thinking_spinner(&self) -> ProgressBar {
        let sp = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_strings(&["·  ", "·· ", "···", " ··", "  ·", "   "]);
        sp.set_style(style.clone().template("{spinner} thinking").unwrap_or(style));
        sp.enable_steady_tick(Duration::from_millis(200));
        sp
    }

    pub fn tool_spinner(&self, name: &str) -> ProgressBar {
        let sp = ProgressBar::new_spinner();
        sp.set_style(ProgressStyle::default_spinner().tick_strings(&["▖", "▘", "▝", "▗", "▚", "▞", ""]));
        sp.set_message(self.tool.apply_to(name).to_string());
        sp.enable_steady_tick(Duration::from_millis(80));
        sp
    }
}
