use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
    Constructor,
    Event,
    Error,
    Fallback,
    Receive,
    #[serde(other)]
    Other,
}

impl Default for EntryKind {
    // Solidity ABI JSON treats a missing `type` as a function.
    fn default() -> Self {
        EntryKind::Function
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AbiParam {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ty: ty.into(),
            name: if name.is_empty() { None } else { Some(name) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: EntryKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub inputs: Vec<AbiParam>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,

    #[serde(
        rename = "stateMutability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub state_mutability: Option<String>,
}

impl AbiEntry {
    pub fn function(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Function,
            name: Some(name.into()),
            inputs,
            outputs: Vec::new(),
            state_mutability: None,
        }
    }

    pub fn event(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Event,
            ..Self::function(name, inputs)
        }
    }

    pub fn constructor(inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Constructor,
            name: None,
            inputs,
            outputs: Vec::new(),
            state_mutability: None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == EntryKind::Function
    }
}

/// Decoded ABI in the order the lookup service returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractInterface {
    entries: Vec<AbiEntry>,
}

impl ContractInterface {
    pub fn new(entries: Vec<AbiEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    pub fn functions(&self) -> impl Iterator<Item = &AbiEntry> {
        self.entries.iter().filter(|entry| entry.is_function())
    }
}
