use std::fmt;

use super::shader::ShaderStage;

/// Shader compilation or program linking failure.
///
/// Nothing recovers from these; callers log them and stop.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A stage's source failed to parse or validate.
    Compile {
        stage: ShaderStage,
        label: String,
        /// Compiler diagnostics, one message per line group.
        log: String,
    },
    /// Stages compiled but cannot be assembled into a program.
    Link {
        label: String,
        reason: String,
    },
}

impl ShaderError {
    pub(crate) fn compile(stage: ShaderStage, label: &str, log: impl Into<String>) -> Self {
        Self::Compile { stage, label: label.to_string(), log: log.into() }
    }

    pub(crate) fn link(label: &str, reason: impl Into<String>) -> Self {
        Self::Link { label: label.to_string(), reason: reason.into() }
    }

    /// The shader or program label the error belongs to.
    pub fn label(&self) -> &str {
        match self {
            Self::Compile { label, .. } | Self::Link { label, .. } => label,
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { stage, label, log } => {
                write!(f, "shader {stage} compilation failed ({label}): {log}")
            }
            Self::Link { label, reason } => {
                write!(f, "program linking failed ({label}): {reason}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}
