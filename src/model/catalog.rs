use serde::{Deserialize, Serialize};

use super::filter::Scope;

/// A company tab. Deleting one cascades its cards into the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Company {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A folder for grouping cards within (or across) companies.
///
/// `company_id` is `All` for folders shown under every company. Old blobs
/// predate the field entirely, so it defaults on deserialize (migration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company_id: Scope,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, company_id: Scope) -> Self {
        Folder {
            id: id.into(),
            name: name.into(),
            company_id,
        }
    }

    /// Whether this folder is listed under the given company filter.
    pub fn visible_under(&self, company: &Scope) -> bool {
        match company {
            Scope::All => true,
            Scope::Id(id) => self.company_id.is_all() || self.company_id.matches(id),
        }
    }
}
