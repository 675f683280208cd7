// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Executable commands handed to the database client.

use crate::value::{DbType, Value};

/// How the client should interpret [`Command::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandType {
    /// Plain SQL text.
    #[default]
    Text
}

/// Direction of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    /// Value sent to the database.
    #[default]
    Input,

    /// Value written by the database.
    Output,

    /// Value sent and written back.
    InputOutput,

    /// Procedure return value.
    ReturnValue
}

/// A named parameter with its bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name without the dialect prefix.
    pub name: String,

    /// Bound value.
    pub value: Value,

    /// Direction.
    pub direction: ParameterDirection,

    /// Explicit database type.
    pub db_type: Option<DbType>
}

impl Parameter {
    /// Input parameter.
    pub fn input(name: impl Into<String>, value: Value, db_type: Option<DbType>) -> Self {
        Self {
            name: name.into(),
            value,
            direction: ParameterDirection::Input,
            db_type
        }
    }
}

/// SQL text with its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Statement text.
    pub text: String,

    /// Interpretation of the text.
    pub command_type: CommandType,

    /// Parameters in placeholder order.
    pub parameters: Vec<Parameter>
}

impl Command {
    /// Text command.
    pub fn text(text: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            text: text.into(),
            command_type: CommandType::Text,
            parameters
        }
    }

    /// Find a parameter by name, without prefix.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Value bound to a parameter, without prefix.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.parameter(name).map(|p| &p.value)
    }
}
