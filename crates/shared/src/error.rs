use thiserror::Error;

/// Which primitive of the injection port an operation used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionOp {
    Move,
    MoveRelative,
    MouseDown,
    MouseUp,
    Click,
    KeyDown,
    KeyUp,
    KeyPress,
    Focus,
}

impl InjectionOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InjectionOp::Move => "move",
            InjectionOp::MoveRelative => "move_relative",
            InjectionOp::MouseDown => "mouse_down",
            InjectionOp::MouseUp => "mouse_up",
            InjectionOp::Click => "click",
            InjectionOp::KeyDown => "key_down",
            InjectionOp::KeyUp => "key_up",
            InjectionOp::KeyPress => "key_press",
            InjectionOp::Focus => "focus",
        }
    }
}

#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("failed to spawn injection backend '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{op:?} failed: {message}")]
    CommandFailed { op: InjectionOp, message: String },
    #[error("{op:?} rejected by injection port: {message}")]
    Rejected { op: InjectionOp, message: String },
    #[error("key code {0} has no symbol on this backend")]
    Unsupported(u32),
    #[error("cannot query target surface geometry: {0}")]
    Geometry(String),
}

impl InjectionError {
    pub fn rejected(op: InjectionOp, message: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            message: message.into(),
        }
    }
}
