//
// candidate.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Width of the left column of the completion menu
pub const MENU_WIDTH: usize = 10;

/// Kind of a completion candidate.
///
/// Objects carry the type tag reported by the R session, e.g. `character`,
/// `data.frame`, or `tbl_df`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Function,
    Package,
    Argument,
    Object(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Function => "function",
            Category::Package => "package",
            Category::Argument => "argument",
            Category::Object(kind) => kind.as_str(),
        }
    }

    /// Data frame like objects whose columns are reached with `$`
    pub fn is_data_frame(&self) -> bool {
        matches!(self, Category::Object(kind) if kind == "data.frame" || kind == "tbl_df")
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "function" => Category::Function,
            "package" => Category::Package,
            "argument" => Category::Argument,
            kind => Category::Object(kind.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Object(kind) => kind,
            category => category.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single completion suggestion handed over to the editor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The word inserted and matched against
    pub label: String,

    pub category: Category,

    /// Package the symbol was found in, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Summary shown next to the label in the menu
    pub menu: String,

    /// Insertable template with `${n:placeholder}` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Arguments of a function, offered when completing inside its call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Candidate>>,
}

impl Candidate {
    /// Builds a candidate with the default menu and nothing else.
    ///
    /// This doesn't check that there is something to complete. Listing lines
    /// go through [crate::listing::create_candidate], which returns `None`
    /// when both the word and the kind are empty.
    pub fn new(label: impl Into<String>, category: Category) -> Self {
        let menu = menu_column(category.as_str());
        Self {
            label: label.into(),
            category,
            package: None,
            menu,
            snippet: None,
            arguments: None,
        }
    }

    /// Argument candidate from a raw `name` or `name = default` token.
    ///
    /// A token that doesn't split into exactly one name and one default
    /// gets an empty default.
    pub fn argument(token: &str) -> Self {
        let parts: Vec<&str> = token.split('=').map(str::trim).collect();
        let name = parts[0];
        let default = if parts.len() == 2 { parts[1] } else { "" };

        let mut candidate = Candidate::new(name, Category::Argument);
        candidate.menu = menu_column("param");

        if default.is_empty() {
            candidate.snippet = Some(format!("{name} = $1"));
        } else {
            candidate.menu.push_str(&format!(" = {default}"));
            candidate.snippet = Some(format!("{name} = ${{1:{default}}}"));
        }

        candidate
    }
}

/// Truncates or pads `text` to the width of the menu column
pub fn menu_column(text: &str) -> String {
    let text: String = text.chars().take(MENU_WIDTH).collect();
    format!("{:<width$}", text, width = MENU_WIDTH)
}
