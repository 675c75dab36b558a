type Name = String;
type Message = String;

/// Looper to Interface Messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooperToInterfaceMessage {
    Thinking,
    Plan(Message),
    ToolCall(Name),
    Observe(Message),
    Output(Message),
    Other(Message),
    Error(Message),
    Warning(Message),
    Help,
    Goodbye,
    TurnComplete,
}
