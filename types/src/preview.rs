//! Structured preview records.

use std::collections::BTreeMap;

use serde::Serialize;

/// One step of an operation's execution sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub step: u32,
    pub action: String,
    pub description: String,
}

/// A computed output value.
///
/// Numbers are carried as decimal strings so values wider than 64 bits survive
/// JSON consumers that parse numbers as doubles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    Number(String),
    Flag(bool),
    Text(String),
}

impl OutputValue {
    pub fn number(value: impl ToString) -> Self {
        Self::Number(value.to_string())
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(value) => Some(value),
            Self::Flag(_) | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            Self::Number(_) | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) | Self::Flag(_) => None,
        }
    }
}

/// Preview of a single operation.
///
/// Built fresh for every request. `outputs` only ever holds values that were
/// actually computed; a structural preview leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    operation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    formula: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    steps: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requirements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    effects: Vec<String>,
    estimated_gas: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, OutputValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl PreviewResult {
    pub fn new(operation: impl Into<String>, estimated_gas: u64) -> Self {
        Self {
            operation: operation.into(),
            formula: String::new(),
            steps: Vec::new(),
            requirements: Vec::new(),
            effects: Vec::new(),
            estimated_gas,
            outputs: BTreeMap::new(),
            warning: None,
            note: None,
        }
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Append a step; steps are numbered in insertion order starting at 1.
    pub fn step(mut self, action: impl Into<String>, description: impl Into<String>) -> Self {
        let step = self.steps.len() as u32 + 1;
        self.steps.push(Step {
            step,
            action: action.into(),
            description: description.into(),
        });
        self
    }

    pub fn requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>, value: OutputValue) -> Self {
        self.outputs.insert(name.into(), value);
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn formula_text(&self) -> &str {
        &self.formula
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    #[must_use]
    pub fn effects(&self) -> &[String] {
        &self.effects
    }

    #[must_use]
    pub const fn estimated_gas(&self) -> u64 {
        self.estimated_gas
    }

    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<String, OutputValue> {
        &self.outputs
    }

    #[must_use]
    pub fn get_output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    /// True when the preview carries computed values rather than only a description.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        !self.outputs.is_empty()
    }

    #[must_use]
    pub fn warning_text(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    #[must_use]
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
